use crate::services::ServiceResult;
use crate::storage::Storage;

use super::{ValidationErrors, is_blank};

pub const TITLE_CANT_BE_EMPTY: &str = "Title cannot be empty";

/// 标题非空且在课时内唯一
pub async fn validate_title(
    storage: &dyn Storage,
    lecture_id: i64,
    title: &str,
    exclude_homework_id: Option<i64>,
) -> ServiceResult<ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_blank(title) {
        errors.add("title", TITLE_CANT_BE_EMPTY);
        return Ok(errors);
    }

    if storage
        .homework_title_exists(lecture_id, title, exclude_homework_id)
        .await?
    {
        errors.add(
            "title",
            format!("A homework with title '{title}' already exists in this lecture"),
        );
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    #[tokio::test]
    async fn test_title_rules() {
        let storage = storage().await;
        let room = classroom(&storage, 0).await;

        let errors = validate_title(&storage, room.lecture.id, "", None)
            .await
            .unwrap();
        assert_eq!(errors.field("title"), [TITLE_CANT_BE_EMPTY]);

        let errors = validate_title(&storage, room.lecture.id, "Executor", None)
            .await
            .unwrap();
        assert_eq!(
            errors.field("title"),
            ["A homework with title 'Executor' already exists in this lecture"]
        );

        assert!(
            validate_title(&storage, room.lecture.id, "Executor", Some(room.homework.id))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
