use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::{
    LoginRequest, LogoutRequest, RegisterRequest, TokenRefreshRequest, TokenVerifyRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn register(
    req: HttpRequest,
    body: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(&req, body.into_inner()).await
}

pub async fn login(req: HttpRequest, body: web::Json<LoginRequest>) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(&req, body.into_inner()).await
}

pub async fn logout(req: HttpRequest, body: web::Json<LogoutRequest>) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req, body.into_inner()).await
}

pub async fn obtain_token(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.obtain_token(&req, body.into_inner()).await
}

pub async fn refresh_token(
    req: HttpRequest,
    body: web::Json<TokenRefreshRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&req, body.into_inner()).await
}

pub async fn verify_token(
    req: HttpRequest,
    body: web::Json<TokenVerifyRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.verify_token(&req, body.into_inner()).await
}

pub async fn blacklist_token(
    req: HttpRequest,
    body: web::Json<TokenRefreshRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.blacklist_token(&req, body.into_inner()).await
}

pub async fn me(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/token", web::post().to(obtain_token))
            .route("/token/refresh", web::post().to(refresh_token))
            .route("/token/verify", web::post().to(verify_token))
            .route("/token/blacklist", web::post().to(blacklist_token))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/logout", web::post().to(logout))
                    .route("/me", web::get().to(me)),
            ),
    );
}
