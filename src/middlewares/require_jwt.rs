/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，通过后把当前用户放进请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/courses")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_courses))
 * ```
 *
 * 处理程序中使用 `RequireJWT::extract_user_claims(&req)` 取得用户。
 *
 * ## 认证流程
 *
 * 1. 解析 Bearer 令牌，校验签名、过期时间与类型（必须是 access）
 * 2. 按 jti 查黑名单（缓存优先），已拉黑返回 403
 * 3. 按 `user:{jti}` 读用户缓存，未命中时查库并回填
 * 4. 用户不存在或已停用返回 401
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::services::auth::blacklist::{self, user_cache_key};
use crate::storage::Storage;
use crate::utils::jwt::{Claims, JwtUtils};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::AUTHORIZATION,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败的原因，决定状态码与错误码
#[derive(Debug)]
enum AuthFailure {
    MissingCredentials,
    InvalidToken(String),
    Blacklisted,
    UserNotFound,
    Inactive,
    Internal(String),
}

impl AuthFailure {
    fn status(&self) -> StatusCode {
        match self {
            AuthFailure::Blacklisted => StatusCode::FORBIDDEN,
            AuthFailure::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            AuthFailure::MissingCredentials => ErrorCode::Unauthorized,
            AuthFailure::InvalidToken(_) => ErrorCode::TokenInvalid,
            AuthFailure::Blacklisted => ErrorCode::TokenBlacklisted,
            AuthFailure::UserNotFound => ErrorCode::UserNotFound,
            AuthFailure::Inactive => ErrorCode::AccountDisabled,
            AuthFailure::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    fn message(&self) -> String {
        match self {
            AuthFailure::MissingCredentials => {
                "Authentication credentials were not provided".to_string()
            }
            AuthFailure::InvalidToken(e) => format!("Invalid token: {e}"),
            AuthFailure::Blacklisted => "Token is blacklisted".to_string(),
            AuthFailure::UserNotFound => "User not found".to_string(),
            AuthFailure::Inactive => "User is inactive".to_string(),
            AuthFailure::Internal(_) => "Internal server error".to_string(),
        }
    }
}

fn bearer_token(headers: &actix_web::http::header::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// 提取并验证 access token，返回当前用户与其 Claims
async fn authenticate(req: &ServiceRequest) -> Result<(User, Claims), AuthFailure> {
    let token = bearer_token(req.headers()).ok_or(AuthFailure::MissingCredentials)?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::InvalidToken(err.to_string())
    })?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("Storage not found in app data".to_string()))?;
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    let blacklisted = blacklist::is_blacklisted(storage.as_ref(), cache.as_deref(), &claims.jti)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?;
    if blacklisted {
        return Err(AuthFailure::Blacklisted);
    }

    let cache_key = user_cache_key(&claims.jti);
    if let Some(cache) = &cache {
        match cache.get_raw(&cache_key).await {
            CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) if user.is_active => return Ok((user, claims)),
                Ok(_) => return Err(AuthFailure::Inactive),
                Err(_) => {
                    debug!("Discarding undecodable cached user for jti {}", claims.jti);
                    cache.remove(&cache_key).await;
                }
            },
            _ => debug!("User not found in cache for jti: {}", claims.jti),
        }
    }

    let user_id = claims
        .user_id()
        .map_err(|e| AuthFailure::InvalidToken(e.to_string()))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?
        .ok_or(AuthFailure::UserNotFound)?;

    if !user.is_active {
        return Err(AuthFailure::Inactive);
    }

    if let Some(cache) = &cache
        && let Ok(user_json) = serde_json::to_string(&user)
    {
        cache
            .insert_raw(cache_key, user_json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok((user, claims))
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok((user, claims)) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(claims);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    if let AuthFailure::Internal(ref detail) = failure {
                        error!("JWT middleware error on {}: {}", req.path(), detail);
                    } else {
                        info!(
                            "JWT authentication failed for request to {}: {:?}",
                            req.path(),
                            failure
                        );
                    }
                    Ok(req.into_response(
                        create_error_response(failure.status(), failure.code(), &failure.message())
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_claims(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role)
    }

    /// 当前请求所用 access token 的 Claims
    pub fn extract_token_claims(req: &HttpRequest) -> Option<Claims> {
        req.extensions().get::<Claims>().cloned()
    }

    /// 原始 Bearer 令牌
    pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
        bearer_token(req.headers()).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderMap, HeaderValue};

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn test_failure_status_mapping() {
        assert_eq!(AuthFailure::Blacklisted.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthFailure::Blacklisted.message(), "Token is blacklisted");
        assert_eq!(AuthFailure::Inactive.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthFailure::MissingCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
