//! 令牌接口：换取、刷新、校验与拉黑

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::ObjectCache;
use crate::errors::LmsError;
use crate::models::auth::{
    AccessTokenResponse, LoginRequest, TokenPairResponse, TokenRefreshRequest, TokenVerifyRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{ServiceError, ServiceResult, cache_from_request, respond};
use crate::storage::Storage;
use crate::utils::jwt::{Claims, JwtUtils};

use super::login::check_credentials;
use super::{AuthService, blacklist};

pub const NO_ACTIVE_ACCOUNT: &str = "No active account found with the given credentials";
pub const FIELD_REQUIRED: &str = "This field is required.";
pub const TOKEN_BLACKLISTED: &str = "Token is blacklisted";

fn required(field: &str, value: Option<String>) -> ServiceResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::field(field, FIELD_REQUIRED))
}

fn invalid_token(err: jsonwebtoken::errors::Error) -> ServiceError {
    ServiceError::Unauthorized(ErrorCode::TokenInvalid, format!("Token is invalid or expired: {err}"))
}

/// 解码后再查黑名单
async fn checked(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    decoded: Result<Claims, jsonwebtoken::errors::Error>,
) -> ServiceResult<Claims> {
    let claims = decoded.map_err(invalid_token)?;
    if blacklist::is_blacklisted(storage, cache, &claims.jti).await? {
        return Err(ServiceError::Unauthorized(
            ErrorCode::TokenBlacklisted,
            TOKEN_BLACKLISTED.to_string(),
        ));
    }
    Ok(claims)
}

pub async fn handle_obtain_token(
    service: &AuthService,
    request: &HttpRequest,
    body: LoginRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let tokens = obtain(storage.as_ref(), &body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(tokens, "Token obtained")))
        }
        .await,
    )
}

pub(crate) async fn obtain(storage: &dyn Storage, body: &LoginRequest) -> ServiceResult<TokenPairResponse> {
    let user = check_credentials(storage, body).await.map_err(|err| match err {
        ServiceError::Validation(_) => {
            ServiceError::Unauthorized(ErrorCode::AuthFailed, NO_ACTIVE_ACCOUNT.to_string())
        }
        other => other,
    })?;

    let pair = JwtUtils::generate_token_pair(user.id, user.role).map_err(LmsError::from)?;
    Ok(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    })
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
    body: TokenRefreshRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let cache = cache_from_request(request);
            let access = refresh(storage.as_ref(), cache.as_deref(), body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(access, "Token refreshed successfully")))
        }
        .await,
    )
}

/// 用未拉黑的 refresh 令牌签发新的 access 令牌
pub(crate) async fn refresh(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    body: TokenRefreshRequest,
) -> ServiceResult<AccessTokenResponse> {
    let token = required("refresh", body.refresh)?;
    let claims = checked(storage, cache, JwtUtils::verify_refresh_token(&token)).await?;

    let user_id = claims.user_id().map_err(invalid_token)?;
    let access = JwtUtils::generate_access_token(user_id, claims.role).map_err(LmsError::from)?;
    Ok(AccessTokenResponse { access })
}

pub async fn handle_verify_token(
    service: &AuthService,
    request: &HttpRequest,
    body: TokenVerifyRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let cache = cache_from_request(request);
            verify(storage.as_ref(), cache.as_deref(), body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Token is valid")))
        }
        .await,
    )
}

/// access 与 refresh 令牌都可校验
pub(crate) async fn verify(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    body: TokenVerifyRequest,
) -> ServiceResult<Claims> {
    let token = required("token", body.token)?;
    checked(storage, cache, JwtUtils::verify_token(&token)).await
}

pub async fn handle_blacklist_token(
    service: &AuthService,
    request: &HttpRequest,
    body: TokenRefreshRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let cache = cache_from_request(request);
            revoke(storage.as_ref(), cache.as_deref(), body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Token blacklisted")))
        }
        .await,
    )
}

pub(crate) async fn revoke(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    body: TokenRefreshRequest,
) -> ServiceResult<()> {
    let token = required("refresh", body.refresh)?;
    let claims = JwtUtils::verify_refresh_token(&token).map_err(invalid_token)?;
    blacklist::blacklist(storage, cache, &claims).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::test_support::storage;
    use crate::utils::jwt::TokenType;
    use crate::utils::password::hash_password;

    async fn seed(storage: &dyn Storage) {
        storage
            .create_user(CreateUserRequest {
                email: "t@example.com".into(),
                password_hash: hash_password("correct-horse").unwrap(),
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap();
    }

    fn credentials(password: &str) -> LoginRequest {
        LoginRequest {
            email: "t@example.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_obtain_token() {
        let storage = storage().await;
        seed(&storage).await;

        let pair = obtain(&storage, &credentials("correct-horse")).await.unwrap();
        let claims = JwtUtils::verify_refresh_token(&pair.refresh).unwrap();
        assert_eq!(claims.role, UserRole::Teacher);

        assert!(matches!(
            obtain(&storage, &credentials("wrong")).await,
            Err(ServiceError::Unauthorized(ErrorCode::AuthFailed, ref msg)) if msg == NO_ACTIVE_ACCOUNT
        ));
    }

    #[tokio::test]
    async fn test_refresh_and_revoke() {
        let storage = storage().await;
        seed(&storage).await;
        let pair = obtain(&storage, &credentials("correct-horse")).await.unwrap();

        let fresh = refresh(
            &storage,
            None,
            TokenRefreshRequest {
                refresh: Some(pair.refresh.clone()),
            },
        )
        .await
        .unwrap();
        let claims = JwtUtils::verify_access_token(&fresh.access).unwrap();
        assert_eq!(claims.token_type, TokenType::Access);

        // access 令牌不能用来刷新
        assert!(matches!(
            refresh(
                &storage,
                None,
                TokenRefreshRequest {
                    refresh: Some(pair.access.clone()),
                },
            )
            .await,
            Err(ServiceError::Unauthorized(ErrorCode::TokenInvalid, _))
        ));

        revoke(
            &storage,
            None,
            TokenRefreshRequest {
                refresh: Some(pair.refresh.clone()),
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            refresh(
                &storage,
                None,
                TokenRefreshRequest {
                    refresh: Some(pair.refresh),
                },
            )
            .await,
            Err(ServiceError::Unauthorized(ErrorCode::TokenBlacklisted, _))
        ));
    }

    #[tokio::test]
    async fn test_verify() {
        let storage = storage().await;
        seed(&storage).await;
        let pair = obtain(&storage, &credentials("correct-horse")).await.unwrap();

        for token in [&pair.access, &pair.refresh] {
            assert!(
                verify(
                    &storage,
                    None,
                    TokenVerifyRequest {
                        token: Some(token.clone()),
                    },
                )
                .await
                .is_ok()
            );
        }

        match verify(&storage, None, TokenVerifyRequest { token: None }).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.field("token"), [FIELD_REQUIRED])
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            verify(
                &storage,
                None,
                TokenVerifyRequest {
                    token: Some("not.a.jwt".into()),
                },
            )
            .await,
            Err(ServiceError::Unauthorized(ErrorCode::TokenInvalid, _))
        ));
    }
}
