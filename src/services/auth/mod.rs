pub mod blacklist;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::auth::{
    LoginRequest, LogoutRequest, RegisterRequest, TokenRefreshRequest, TokenVerifyRequest,
};
use crate::storage::Storage;

use super::impl_service_storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl_service_storage!(AuthService);

impl AuthService {
    // 用户注册
    pub async fn register(
        &self,
        request: &HttpRequest,
        body: RegisterRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, request, body).await
    }

    // 登录验证
    pub async fn login(
        &self,
        request: &HttpRequest,
        body: LoginRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, request, body).await
    }

    // 登出，拉黑 refresh 与 access 令牌
    pub async fn logout(
        &self,
        request: &HttpRequest,
        body: LogoutRequest,
    ) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request, body).await
    }

    // 用账号密码换取令牌对
    pub async fn obtain_token(
        &self,
        request: &HttpRequest,
        body: LoginRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_obtain_token(self, request, body).await
    }

    // 刷新令牌
    pub async fn refresh_token(
        &self,
        request: &HttpRequest,
        body: TokenRefreshRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request, body).await
    }

    // 验证令牌
    pub async fn verify_token(
        &self,
        request: &HttpRequest,
        body: TokenVerifyRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_verify_token(self, request, body).await
    }

    // 主动拉黑 refresh 令牌
    pub async fn blacklist_token(
        &self,
        request: &HttpRequest,
        body: TokenRefreshRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_blacklist_token(self, request, body).await
    }

    // 获取当前用户信息
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_me(request).await
    }
}
