use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LectureService;
use crate::models::lectures::entities::Lecture;
use crate::models::lectures::requests::UpdateLectureRequest;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{require_course_manager, resolve_lecture};
use crate::services::validation::lectures::validate_topic;
use crate::services::{ServiceError, ServiceResult, current_user, respond};
use crate::storage::Storage;

pub async fn update_lecture(
    service: &LectureService,
    request: &HttpRequest,
    course_id: i64,
    lecture_id: i64,
    body: UpdateLectureRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let lecture = update(storage.as_ref(), &user, course_id, lecture_id, body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                lecture,
                "Lecture updated successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn update(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    lecture_id: i64,
    body: UpdateLectureRequest,
) -> ServiceResult<Lecture> {
    let ctx = resolve_lecture(storage, course_id, lecture_id, user.id).await?;
    require_course_manager(&ctx.access, user)?;

    let topic = body.topic.map(|t| t.trim().to_string());
    if let Some(topic) = &topic {
        validate_topic(storage, course_id, topic, Some(lecture_id))
            .await?
            .into_result()?;
    }

    storage
        .update_lecture(lecture_id, UpdateLectureRequest { topic })
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::LectureNotFound, "Lecture does not exist"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    #[tokio::test]
    async fn test_update_topic() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let other = storage.create_lecture(room.course.id, "Traits").await.unwrap();

        // 保留原主题不算重复
        let lecture = update(
            &storage,
            &room.teacher,
            room.course.id,
            room.lecture.id,
            UpdateLectureRequest {
                topic: Some("Async".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(lecture.topic, "Async");

        assert!(matches!(
            update(
                &storage,
                &room.teacher,
                room.course.id,
                other.id,
                UpdateLectureRequest {
                    topic: Some("Async".into()),
                },
            )
            .await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            update(
                &storage,
                &room.students[0],
                room.course.id,
                other.id,
                UpdateLectureRequest { topic: None },
            )
            .await,
            Err(ServiceError::Forbidden(..))
        ));
    }
}
