use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, grade_response};
use crate::models::grades::requests::UpdateGradeRequest;
use crate::models::grades::responses::GradeResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{find_grade, require_grader, resolve_submission};
use crate::services::validation::grades::validate_grade_update;
use crate::services::{ServiceError, ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn update_grade(
    service: &GradeService,
    request: &HttpRequest,
    ids: SafePathIds,
    body: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let response = update(storage.as_ref(), &user, &ids, body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Grade updated successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn update(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    mut body: UpdateGradeRequest,
) -> ServiceResult<GradeResponse> {
    let ctx = resolve_submission(storage, ids, user.id).await?;
    let grade = find_grade(storage, &ctx.submission, ids.grade_id()).await?;
    require_grader(&ctx.access, &grade, user)?;
    validate_grade_update(body.grade).into_result()?;

    body.comments = body.comments.map(|c| c.trim().to_string());
    let grade = storage
        .update_grade(grade.id, body)
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::GradeNotFound, "Grade does not exist"))?;
    grade_response(storage, &ctx.homework, ctx.submission, grade).await
}
