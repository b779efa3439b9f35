use crate::services::ServiceResult;
use crate::storage::Storage;

use super::{ValidationErrors, is_blank};

pub const TOPIC_CANT_BE_EMPTY: &str = "Topic cannot be empty";

/// 主题非空且在课程内唯一；更新时 `exclude_lecture_id` 排除自身
pub async fn validate_topic(
    storage: &dyn Storage,
    course_id: i64,
    topic: &str,
    exclude_lecture_id: Option<i64>,
) -> ServiceResult<ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_blank(topic) {
        errors.add("topic", TOPIC_CANT_BE_EMPTY);
        return Ok(errors);
    }

    if storage
        .lecture_topic_exists(course_id, topic, exclude_lecture_id)
        .await?
    {
        errors.add(
            "topic",
            format!("A lecture with topic '{topic}' already exists in this course"),
        );
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    #[tokio::test]
    async fn test_topic_rules() {
        let storage = storage().await;
        let room = classroom(&storage, 0).await;

        let errors = validate_topic(&storage, room.course.id, " ", None)
            .await
            .unwrap();
        assert_eq!(errors.field("topic"), [TOPIC_CANT_BE_EMPTY]);

        let errors = validate_topic(&storage, room.course.id, "Async", None)
            .await
            .unwrap();
        assert_eq!(
            errors.field("topic"),
            ["A lecture with topic 'Async' already exists in this course"]
        );

        let errors = validate_topic(&storage, room.course.id, "Async", Some(room.lecture.id))
            .await
            .unwrap();
        assert!(errors.is_empty());
    }
}
