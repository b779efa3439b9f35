use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{HomeworkService, homework_response};
use crate::models::ApiResponse;
use crate::services::access::resolve_homework;
use crate::services::{current_user, respond};
use crate::utils::SafePathIds;

pub async fn get_homework(
    service: &HomeworkService,
    request: &HttpRequest,
    ids: SafePathIds,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let ctx = resolve_homework(
                storage.as_ref(),
                ids.course_id(),
                ids.lecture_id(),
                ids.homework_id(),
                user.id,
            )
            .await?;

            let response = homework_response(storage.as_ref(), &ctx.lecture, ctx.homework).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Homework retrieved successfully",
            )))
        }
        .await,
    )
}
