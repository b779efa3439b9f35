use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, submission_responses};
use crate::models::{Page, PageRequest, PaginationQuery};
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::users::entities::User;
use crate::services::access::resolve_homework;
use crate::services::{ServiceResult, current_user, page_request, paginated_response, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    ids: SafePathIds,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let page = list(storage.as_ref(), &user, &ids, page_request(&query)).await?;
            Ok(paginated_response(request, page, "Submission list retrieved successfully"))
        }
        .await,
    )
}

pub(crate) async fn list(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    page: PageRequest,
) -> ServiceResult<Page<SubmissionResponse>> {
    let ctx = resolve_homework(
        storage,
        ids.course_id(),
        ids.lecture_id(),
        ids.homework_id(),
        user.id,
    )
    .await?;

    let only_student = user.is_student().then_some(user.id);
    let mut page = storage
        .list_submissions_with_pagination(ctx.homework.id, only_student, page)
        .await?;
    let submissions = std::mem::take(&mut page.items);
    Ok(page.with_items(submission_responses(storage, &ctx.homework, submissions).await?))
}
