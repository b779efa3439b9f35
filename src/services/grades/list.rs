use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, grade_responses, resolve_grade_viewer};
use crate::models::grades::responses::GradeResponse;
use crate::models::users::entities::User;
use crate::models::{Page, PageRequest, PaginationQuery};
use crate::services::{ServiceResult, current_user, page_request, paginated_response, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    ids: SafePathIds,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let page = list(storage.as_ref(), &user, &ids, page_request(&query)).await?;
            Ok(paginated_response(request, page, "Grade list retrieved successfully"))
        }
        .await,
    )
}

pub(crate) async fn list(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    page: PageRequest,
) -> ServiceResult<Page<GradeResponse>> {
    let ctx = resolve_grade_viewer(storage, ids, user).await?;

    let mut page = storage
        .list_grades_with_pagination(ctx.submission.id, page)
        .await?;
    let grades = std::mem::take(&mut page.items);
    Ok(page.with_items(grade_responses(storage, &ctx.homework, ctx.submission, grades).await?))
}
