use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::requests::{UserListParams, UserListQuery};
use crate::services::{page_request, paginated_response, respond};

pub async fn list_users(
    service: &UserService,
    request: &HttpRequest,
    query: UserListParams,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let page = storage
                .list_users_with_pagination(
                    UserListQuery {
                        role: query.role,
                        search: query.search,
                    },
                    page_request(&query.pagination),
                )
                .await?;

            Ok(paginated_response(
                request,
                page,
                "User list retrieved successfully",
            ))
        }
        .await,
    )
}
