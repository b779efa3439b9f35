use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::LmsError;
use crate::models::auth::{AuthResponse, AuthUser, RegisterRequest, TokenPairResponse};
use crate::models::users::requests::CreateUserRequest;
use crate::models::ApiResponse;
use crate::services::validation::users::validate_registration;
use crate::services::{ServiceResult, respond};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    request: &HttpRequest,
    body: RegisterRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let response = register(storage.as_ref(), body).await?;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                response,
                "Account created successfully",
            )))
        }
        .await,
    )
}

/// 校验、创建用户并签发令牌对
pub(crate) async fn register(
    storage: &dyn Storage,
    body: RegisterRequest,
) -> ServiceResult<AuthResponse> {
    validate_registration(storage, &body).await?.into_result()?;

    let password_hash = hash_password(&body.password)?;
    let user = storage
        .create_user(CreateUserRequest {
            email: body.email.trim().to_string(),
            password_hash,
            first_name: body.first_name.trim().to_string(),
            last_name: body.last_name.trim().to_string(),
            role: body.role.unwrap_or_default(),
        })
        .await?;

    let tokens = JwtUtils::generate_token_pair(user.id, user.role).map_err(LmsError::from)?;
    tracing::info!("User {} registered as {}", user.email, user.role);

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
    use crate::services::ServiceError;
    use crate::storage::sea_orm_storage::test_support::storage;

    fn register_request(email: &str, role: Option<UserRole>) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            role,
            password: "s3cure-pass".to_string(),
            password_confirm: "s3cure-pass".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_tokens() {
        let storage = storage().await;
        let response = register(&storage, register_request("g@example.com", Some(UserRole::Teacher)))
            .await
            .unwrap();

        assert_eq!(response.user.role, UserRole::Teacher);
        let claims = JwtUtils::verify_access_token(&response.tokens.access).unwrap();
        assert_eq!(claims.user_id().unwrap(), response.user.id);
        assert!(JwtUtils::verify_refresh_token(&response.tokens.refresh).is_ok());

        let stored = storage
            .get_user_by_email_impl("g@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "s3cure-pass");
    }

    #[tokio::test]
    async fn test_register_defaults_to_student_and_rejects_duplicates() {
        let storage = storage().await;
        let response = register(&storage, register_request("s@example.com", None))
            .await
            .unwrap();
        assert_eq!(response.user.role, UserRole::Student);

        let err = register(&storage, register_request("s@example.com", None))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert_eq!(errors.field("email").len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
