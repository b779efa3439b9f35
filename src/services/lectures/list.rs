use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LectureService;
use crate::models::PaginationQuery;
use crate::services::access::resolve_course;
use crate::services::{current_user, page_request, paginated_response, respond};

pub async fn list_lectures(
    service: &LectureService,
    request: &HttpRequest,
    course_id: i64,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            resolve_course(storage.as_ref(), course_id, user.id).await?;

            let page = storage
                .list_lectures_with_pagination(course_id, page_request(&query))
                .await?;
            Ok(paginated_response(request, page, "Lecture list retrieved successfully"))
        }
        .await,
    )
}
