use crate::models::users::entities::{User, UserRole};
use serde::Serialize;
use ts_rs::TS;

// 认证接口返回的用户信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

// 注册与登录响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct AuthResponse {
    pub user: AuthUser,
    pub tokens: TokenPairResponse,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}
