use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{HomeworkService, homework_responses};
use crate::models::PaginationQuery;
use crate::services::access::resolve_lecture;
use crate::services::{current_user, page_request, paginated_response, respond};
use crate::utils::SafePathIds;

pub async fn list_homeworks(
    service: &HomeworkService,
    request: &HttpRequest,
    ids: SafePathIds,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let ctx =
                resolve_lecture(storage.as_ref(), ids.course_id(), ids.lecture_id(), user.id).await?;

            let mut page = storage
                .list_homeworks_with_pagination(ctx.lecture.id, page_request(&query))
                .await?;
            let homeworks = std::mem::take(&mut page.items);
            let page =
                page.with_items(homework_responses(storage.as_ref(), &ctx.lecture, homeworks).await?);

            Ok(paginated_response(request, page, "Homework list retrieved successfully"))
        }
        .await,
    )
}
