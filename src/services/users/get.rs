use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::entities::User;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::validation::users::USER_DOESNT_EXIST;
use crate::services::{ServiceError, ServiceResult, respond};
use crate::storage::Storage;

pub async fn get_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = find_user(storage.as_ref(), user_id).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information retrieved successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn find_user(storage: &dyn Storage, user_id: i64) -> ServiceResult<User> {
    storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, USER_DOESNT_EXIST))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{storage, user};

    #[tokio::test]
    async fn test_find_user() {
        let storage = storage().await;
        let teacher = user(&storage, "t@example.com", UserRole::Teacher).await;

        assert_eq!(find_user(&storage, teacher.id).await.unwrap().email, "t@example.com");
        assert!(matches!(
            find_user(&storage, 9999).await,
            Err(ServiceError::NotFound(ErrorCode::UserNotFound, _))
        ));
    }
}
