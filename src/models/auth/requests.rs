use serde::Deserialize;
use ts_rs::TS;

use crate::models::users::entities::UserRole;

// 注册请求，缺失字段按空串处理，交给校验层给出字段错误
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

// 用户登录请求（来自HTTP请求），同时用于 token 获取接口
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// 登出请求，access_token 缺省时取 Authorization 头
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct TokenRefreshRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct TokenVerifyRequest {
    #[serde(default)]
    pub token: Option<String>,
}
