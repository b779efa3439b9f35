use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, submission_response};
use crate::models::submissions::requests::UpdateSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{require_submission_access, resolve_submission};
use crate::services::validation::submissions::validate_submission_update;
use crate::services::{ServiceError, ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    ids: SafePathIds,
    body: UpdateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let response = update(storage.as_ref(), &user, &ids, body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Submission updated successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn update(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    body: UpdateSubmissionRequest,
) -> ServiceResult<SubmissionResponse> {
    let ctx = resolve_submission(storage, ids, user.id).await?;
    require_submission_access(&ctx.access, &ctx.homework, &ctx.submission, user)?;
    validate_submission_update(body.content.as_deref()).into_result()?;

    let submission = storage
        .update_submission(ctx.submission.id, body)
        .await?
        .ok_or_else(|| {
            ServiceError::not_found(ErrorCode::SubmissionNotFound, "Submission does not exist")
        })?;
    submission_response(storage, &ctx.homework, submission).await
}
