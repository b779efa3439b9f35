use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LectureService;
use crate::models::ApiResponse;
use crate::services::access::resolve_lecture;
use crate::services::{current_user, respond};

pub async fn get_lecture(
    service: &LectureService,
    request: &HttpRequest,
    course_id: i64,
    lecture_id: i64,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let ctx = resolve_lecture(storage.as_ref(), course_id, lecture_id, user.id).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ctx.lecture,
                "Lecture retrieved successfully",
            )))
        }
        .await,
    )
}
