use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, grade_response, resolve_grade_viewer};
use crate::models::ApiResponse;
use crate::services::access::find_grade;
use crate::services::{current_user, respond};
use crate::utils::SafePathIds;

pub async fn get_grade(
    service: &GradeService,
    request: &HttpRequest,
    ids: SafePathIds,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let ctx = resolve_grade_viewer(storage.as_ref(), &ids, &user).await?;
            let grade = find_grade(storage.as_ref(), &ctx.submission, ids.grade_id()).await?;

            let response =
                grade_response(storage.as_ref(), &ctx.homework, ctx.submission, grade).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Grade retrieved successfully",
            )))
        }
        .await,
    )
}
