use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error, ErrorKind},
};
use serde::{Deserialize, Serialize};

/// 令牌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,           // 用户 ID
    pub role: UserRole,        // 用户角色
    pub token_type: TokenType, // access 或 refresh
    pub jti: String,           // 令牌唯一标识，黑名单以此为键
    pub exp: usize,            // 过期时间
    pub iat: usize,            // 签发时间
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, Error> {
        self.sub
            .parse::<i64>()
            .map_err(|_| Error::from(ErrorKind::InvalidSubject))
    }

    pub fn expires_at(&self) -> i64 {
        self.exp as i64
    }
}

// 一对令牌
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub struct JwtUtils;

impl JwtUtils {
    /// 使用指定密钥签发令牌
    pub fn issue_with_secret(
        secret: &str,
        user_id: i64,
        role: UserRole,
        token_type: TokenType,
        ttl: chrono::Duration,
    ) -> Result<String, Error> {
        let now = chrono::Utc::now();
        let expiration = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            token_type,
            jti: uuid::Uuid::new_v4().to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// 使用指定密钥校验签名与过期时间
    pub fn decode_with_secret(secret: &str, token: &str) -> Result<Claims, Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }

    pub fn generate_access_token(user_id: i64, role: UserRole) -> Result<String, Error> {
        let config = AppConfig::get();
        Self::issue_with_secret(
            &config.jwt.secret,
            user_id,
            role,
            TokenType::Access,
            config.jwt.access_ttl(),
        )
    }

    pub fn generate_refresh_token(user_id: i64, role: UserRole) -> Result<String, Error> {
        let config = AppConfig::get();
        Self::issue_with_secret(
            &config.jwt.secret,
            user_id,
            role,
            TokenType::Refresh,
            config.jwt.refresh_ttl(),
        )
    }

    pub fn generate_token_pair(user_id: i64, role: UserRole) -> Result<TokenPair, Error> {
        Ok(TokenPair {
            access: Self::generate_access_token(user_id, role)?,
            refresh: Self::generate_refresh_token(user_id, role)?,
        })
    }

    // 验证 JWT token
    pub fn verify_token(token: &str) -> Result<Claims, Error> {
        Self::decode_with_secret(&AppConfig::get().jwt.secret, token)
    }

    // 验证 token 是否为指定类型
    pub fn verify_token_type(token: &str, expected: TokenType) -> Result<Claims, Error> {
        let claims = Self::verify_token(token)?;
        ensure_type(claims, expected)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, Error> {
        Self::verify_token_type(token, TokenType::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, Error> {
        Self::verify_token_type(token, TokenType::Refresh)
    }
}

/// 类型不符视为无效令牌
pub fn ensure_type(claims: Claims, expected: TokenType) -> Result<Claims, Error> {
    if claims.token_type != expected {
        return Err(Error::from(ErrorKind::InvalidToken));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_and_decode() {
        let token = JwtUtils::issue_with_secret(
            SECRET,
            42,
            UserRole::Teacher,
            TokenType::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();

        let claims = JwtUtils::decode_with_secret(SECRET, &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, UserRole::Teacher);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(uuid::Uuid::parse_str(&claims.jti).is_ok());
        assert!(ensure_type(claims, TokenType::Refresh).is_err());
    }

    #[test]
    fn test_each_token_gets_unique_jti() {
        let issue = || {
            JwtUtils::issue_with_secret(
                SECRET,
                1,
                UserRole::Student,
                TokenType::Refresh,
                chrono::Duration::days(1),
            )
            .unwrap()
        };
        let a = JwtUtils::decode_with_secret(SECRET, &issue()).unwrap();
        let b = JwtUtils::decode_with_secret(SECRET, &issue()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_rejects_wrong_secret_and_expired() {
        let token = JwtUtils::issue_with_secret(
            SECRET,
            1,
            UserRole::Student,
            TokenType::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret("other", &token).is_err());

        let expired = JwtUtils::issue_with_secret(
            SECRET,
            1,
            UserRole::Student,
            TokenType::Access,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        let err = JwtUtils::decode_with_secret(SECRET, &expired).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn test_garbage_token() {
        assert!(JwtUtils::decode_with_secret(SECRET, "not-a-token").is_err());
    }
}
