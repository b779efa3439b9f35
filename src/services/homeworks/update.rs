use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{HomeworkService, homework_response};
use crate::models::homeworks::requests::UpdateHomeworkRequest;
use crate::models::homeworks::responses::HomeworkResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{require_homework_owner, resolve_homework};
use crate::services::validation::homeworks::validate_title;
use crate::services::{ServiceError, ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn update_homework(
    service: &HomeworkService,
    request: &HttpRequest,
    ids: SafePathIds,
    body: UpdateHomeworkRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let response = update(storage.as_ref(), &user, &ids, body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Homework updated successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn update(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    mut body: UpdateHomeworkRequest,
) -> ServiceResult<HomeworkResponse> {
    let ctx = resolve_homework(
        storage,
        ids.course_id(),
        ids.lecture_id(),
        ids.homework_id(),
        user.id,
    )
    .await?;
    require_homework_owner(&ctx.access, &ctx.homework, user)?;

    body.title = body.title.map(|t| t.trim().to_string());
    body.description = body.description.map(|d| d.trim().to_string());
    if let Some(title) = &body.title {
        validate_title(storage, ctx.lecture.id, title, Some(ctx.homework.id))
            .await?
            .into_result()?;
    }

    let homework = storage
        .update_homework(ctx.homework.id, body)
        .await?
        .ok_or_else(|| {
            ServiceError::not_found(ErrorCode::HomeworkNotFound, "Homework does not exist")
        })?;
    homework_response(storage, &ctx.lecture, homework).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage, user};

    fn ids(course_id: i64, lecture_id: i64, homework_id: i64) -> SafePathIds {
        SafePathIds::from_ids([
            ("course_id", course_id),
            ("lecture_id", lecture_id),
            ("homework_id", homework_id),
        ])
    }

    #[tokio::test]
    async fn test_update_homework() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let path = ids(room.course.id, room.lecture.id, room.homework.id);
        let due = chrono::Utc::now() + chrono::Duration::days(3);

        let response = update(
            &storage,
            &room.teacher,
            &path,
            UpdateHomeworkRequest {
                description: Some(" Use a channel ".into()),
                due_date: Some(due),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(response.title, "Executor");
        assert_eq!(response.description, "Use a channel");
        assert_eq!(response.due_date.timestamp(), due.timestamp());
    }

    #[tokio::test]
    async fn test_update_requires_owner() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let outsider = user(&storage, "other@example.com", UserRole::Teacher).await;
        let path = ids(room.course.id, room.lecture.id, room.homework.id);

        for intruder in [&room.students[0], &outsider] {
            assert!(matches!(
                update(&storage, intruder, &path, UpdateHomeworkRequest::default()).await,
                Err(ServiceError::Forbidden(..))
            ));
        }
    }
}
