use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::users::entities::User;
use crate::services::access::{require_submission_access, resolve_submission};
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn delete_submission(
    service: &SubmissionService,
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
    let ctx = resolve_submission(storage, ids, user.id).await?;
    require_submission_access(&ctx.access, &ctx.homework, &ctx.submission, user)?;

    storage.delete_submission(ctx.submission.id).await?;
    info!("Submission {} deleted by user {}", ctx.submission.id, user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::services::ServiceError;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    #[tokio::test]
    async fn test_teacher_deletes_submission() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let submission = storage
            .create_submission(room.homework.id, room.students[0].id, "answer")
            .await
            .unwrap();
        let path = SafePathIds::from_ids([
            ("course_id", room.course.id),
            ("lecture_id", room.lecture.id),
            ("homework_id", room.homework.id),
            ("submission_id", submission.id),
        ]);

        delete(&storage, &room.teacher, &path).await.unwrap();
        assert!(matches!(
            delete(&storage, &room.teacher, &path).await,
            Err(ServiceError::NotFound(ErrorCode::SubmissionNotFound, _))
        ));
    }
}
