use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::LmsError;
use crate::models::auth::{AuthResponse, AuthUser, LoginRequest, TokenPairResponse};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, NON_FIELD_ERRORS};
use crate::services::{ServiceError, ServiceResult, respond};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INACTIVE_ACCOUNT: &str = "Account is disabled";

pub async fn handle_login(
    service: &AuthService,
    request: &HttpRequest,
    body: LoginRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let response = login(storage.as_ref(), &body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        .await,
    )
}

/// 校验邮箱与密码；停用账号单独提示
pub(crate) async fn check_credentials(
    storage: &dyn Storage,
    body: &LoginRequest,
) -> ServiceResult<User> {
    let user = storage
        .get_user_by_email(body.email.trim())
        .await?
        .filter(|user| verify_password(&body.password, &user.password_hash))
        .ok_or_else(|| ServiceError::field(NON_FIELD_ERRORS, INVALID_CREDENTIALS))?;

    if !user.is_active {
        return Err(ServiceError::field(NON_FIELD_ERRORS, INACTIVE_ACCOUNT));
    }

    Ok(user)
}

pub(crate) async fn login(storage: &dyn Storage, body: &LoginRequest) -> ServiceResult<AuthResponse> {
    let user = check_credentials(storage, body).await?;

    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }
    let user = storage.get_user_by_id(user.id).await?.unwrap_or(user);

    let tokens = JwtUtils::generate_token_pair(user.id, user.role).map_err(LmsError::from)?;
    tracing::info!("User {} logged in successfully", user.email);

    Ok(AuthResponse {
        user: AuthUser::from(&user),
        tokens: TokenPairResponse {
            access: tokens.access,
            refresh: tokens.refresh,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::test_support::storage;
    use crate::utils::password::hash_password;

    async fn seed(storage: &dyn Storage) -> User {
        storage
            .create_user(CreateUserRequest {
                email: "ada@example.com".into(),
                password_hash: hash_password("analytical").unwrap(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap()
    }

    fn credentials(password: &str) -> LoginRequest {
        LoginRequest {
            email: "ada@example.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_updates_last_login() {
        let storage = storage().await;
        let user = seed(&storage).await;
        assert!(user.last_login.is_none());

        let response = login(&storage, &credentials("analytical")).await.unwrap();
        assert_eq!(response.user.id, user.id);
        assert!(response.user.last_login.is_some());
        assert!(JwtUtils::verify_access_token(&response.tokens.access).is_ok());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let storage = storage().await;
        seed(&storage).await;

        match login(&storage, &credentials("wrong")).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.first_message(), Some(INVALID_CREDENTIALS))
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.user.id)),
        }
    }
}
