use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::HomeworkService;
use crate::models::users::entities::User;
use crate::services::access::{require_homework_owner, resolve_homework};
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn delete_homework(
    service: &HomeworkService,
    request: &HttpRequest,
    ids: SafePathIds,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            delete(storage.as_ref(), &user, &ids).await?;
            Ok(HttpResponse::NoContent().finish())
        }
        .await,
    )
}

pub(crate) async fn delete(storage: &dyn Storage, user: &User, ids: &SafePathIds) -> ServiceResult<()> {
    let ctx = resolve_homework(
        storage,
        ids.course_id(),
        ids.lecture_id(),
        ids.homework_id(),
        user.id,
    )
    .await?;
    require_homework_owner(&ctx.access, &ctx.homework, user)?;

    storage.delete_homework(ctx.homework.id).await?;
    info!("Homework {} deleted by user {}", ctx.homework.id, user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::models::users::entities::UserRole;
    use crate::services::ServiceError;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage, user};

    #[tokio::test]
    async fn test_assigned_teacher_can_delete() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let assistant = user(&storage, "a@example.com", UserRole::Teacher).await;
        storage
            .update_course(
                room.course.id,
                crate::models::courses::requests::UpdateCourseRequest {
                    teacher_ids: Some(vec![assistant.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let path = SafePathIds::from_ids([
            ("course_id", room.course.id),
            ("lecture_id", room.lecture.id),
            ("homework_id", room.homework.id),
        ]);

        assert!(matches!(
            delete(&storage, &room.students[0], &path).await,
            Err(ServiceError::Forbidden(..))
        ));
        delete(&storage, &assistant, &path).await.unwrap();
        assert!(matches!(
            delete(&storage, &assistant, &path).await,
            Err(ServiceError::NotFound(ErrorCode::HomeworkNotFound, _))
        ));
    }
}
