use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use crate::models::users::entities::User;
use crate::services::access::{find_grade, require_grader, resolve_submission};
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn delete_grade(
    service: &GradeService,
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
    let grade = find_grade(storage, &ctx.submission, ids.grade_id()).await?;
    require_grader(&ctx.access, &grade, user)?;

    storage.delete_grade(grade.id).await?;
    info!("Grade {} deleted by user {}", grade.id, user.id);
    Ok(())
}
