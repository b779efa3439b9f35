use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::auth::LogoutRequest;
use crate::services::validation::ValidationErrors;
use crate::services::{ServiceError, ServiceResult, cache_from_request, respond};
use crate::storage::Storage;
use crate::utils::jwt::{Claims, JwtUtils};

use super::{AuthService, blacklist};

pub const REFRESH_TOKEN_REQUIRED: &str = "Refresh token is required";

/// 处理用户登出
/// access_token 缺省时使用本次请求的 Bearer 令牌
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
    body: LogoutRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let cache = cache_from_request(request);
            let bearer = RequireJWT::extract_bearer_token(request);

            logout(storage.as_ref(), cache.as_deref(), body, bearer).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Successfully logged out")))
        }
        .await,
    )
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}

/// 两个令牌都能解析时才拉黑，任何一个无效都不做修改
pub(crate) async fn logout(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    body: LogoutRequest,
    bearer: Option<String>,
) -> ServiceResult<()> {
    let refresh = non_empty(body.refresh_token)
        .ok_or_else(|| ServiceError::field("refresh_token", REFRESH_TOKEN_REQUIRED))?;
    let access = non_empty(body.access_token).or(bearer);

    let mut errors = ValidationErrors::new();
    let mut targets: Vec<Claims> = Vec::with_capacity(2);

    match JwtUtils::verify_refresh_token(refresh.trim()) {
        Ok(claims) => targets.push(claims),
        Err(e) => errors.add("refresh_token", format!("Invalid token: {e}")),
    }
    if let Some(access) = access {
        match JwtUtils::verify_access_token(access.trim()) {
            Ok(claims) => targets.push(claims),
            Err(e) => errors.add("access_token", format!("Invalid token: {e}")),
        }
    }
    errors.into_result()?;

    for claims in &targets {
        blacklist::blacklist(storage, cache, claims).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaCacheWrapper;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{storage, user};

    #[tokio::test]
    async fn test_logout_blacklists_both_tokens() {
        let storage = storage().await;
        let cache = MokaCacheWrapper::with_settings(100, 60).unwrap();
        let student = user(&storage, "s@example.com", UserRole::Student).await;
        let pair = JwtUtils::generate_token_pair(student.id, student.role).unwrap();

        logout(
            &storage,
            Some(&cache),
            LogoutRequest {
                refresh_token: Some(pair.refresh.clone()),
                access_token: None,
            },
            Some(pair.access.clone()),
        )
        .await
        .unwrap();

        for token in [&pair.refresh, &pair.access] {
            let claims = JwtUtils::verify_token(token).unwrap();
            assert!(storage.is_token_blacklisted_impl(&claims.jti).await.unwrap());
        }

        // 重复登出不报错
        logout(
            &storage,
            None,
            LogoutRequest {
                refresh_token: Some(pair.refresh),
                access_token: None,
            },
            None,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_logout_field_errors() {
        let storage = storage().await;

        match logout(&storage, None, LogoutRequest::default(), None).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.field("refresh_token"), [REFRESH_TOKEN_REQUIRED])
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let student = user(&storage, "s@example.com", UserRole::Student).await;
        let pair = JwtUtils::generate_token_pair(student.id, student.role).unwrap();
        // access 令牌放在 refresh 字段里，类型不符
        match logout(
            &storage,
            None,
            LogoutRequest {
                refresh_token: Some(pair.access.clone()),
                access_token: Some("garbage".into()),
            },
            None,
        )
        .await
        {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.field("refresh_token")[0].starts_with("Invalid token: "));
                assert!(errors.field("access_token")[0].starts_with("Invalid token: "));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        let claims = JwtUtils::verify_token(&pair.access).unwrap();
        assert!(!storage.is_token_blacklisted_impl(&claims.jti).await.unwrap());
    }
}
