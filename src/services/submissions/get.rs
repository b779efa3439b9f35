use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, submission_response};
use crate::models::ApiResponse;
use crate::services::access::{require_submission_access, resolve_submission};
use crate::services::{current_user, respond};
use crate::utils::SafePathIds;

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    ids: SafePathIds,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let ctx = resolve_submission(storage.as_ref(), &ids, user.id).await?;
            require_submission_access(&ctx.access, &ctx.homework, &ctx.submission, &user)?;

            let response =
                submission_response(storage.as_ref(), &ctx.homework, ctx.submission).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Submission retrieved successfully",
            )))
        }
        .await,
    )
}
