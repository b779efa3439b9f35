//! 令牌黑名单：数据库为准，缓存只记录已拉黑的 jti

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::Result;
use crate::storage::Storage;
use crate::utils::jwt::Claims;

fn blacklist_key(jti: &str) -> String {
    format!("blacklist:{jti}")
}

pub fn user_cache_key(jti: &str) -> String {
    format!("user:{jti}")
}

/// 先查缓存，未命中再查库并回填
pub async fn is_blacklisted(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    jti: &str,
) -> Result<bool> {
    if let Some(cache) = cache
        && let CacheResult::Found(_) = cache.get_raw(&blacklist_key(jti)).await
    {
        return Ok(true);
    }

    let blacklisted = storage.is_token_blacklisted(jti).await?;
    if blacklisted && let Some(cache) = cache {
        cache.insert_raw(blacklist_key(jti), "1".to_string(), 0).await;
    }
    Ok(blacklisted)
}

/// 拉黑令牌，同时清掉该令牌对应的用户缓存；重复拉黑返回 false
pub async fn blacklist(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    claims: &Claims,
) -> Result<bool> {
    let user_id = claims.user_id()?;
    let inserted = storage
        .blacklist_token(
            &claims.jti,
            user_id,
            claims.token_type.as_str(),
            claims.expires_at(),
        )
        .await?;

    if let Some(cache) = cache {
        let remaining = claims.expires_at() - chrono::Utc::now().timestamp();
        cache
            .insert_raw(
                blacklist_key(&claims.jti),
                "1".to_string(),
                remaining.max(1) as u64,
            )
            .await;
        cache.remove(&user_cache_key(&claims.jti)).await;
    }

    tracing::debug!(
        "Token {} ({}) of user {} blacklisted",
        claims.jti,
        claims.token_type.as_str(),
        user_id
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaCacheWrapper;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{storage, user};
    use crate::utils::jwt::{JwtUtils, TokenType};

    fn claims_for(user_id: i64) -> Claims {
        let token = JwtUtils::issue_with_secret(
            "secret",
            user_id,
            UserRole::Student,
            TokenType::Refresh,
            chrono::Duration::days(1),
        )
        .unwrap();
        JwtUtils::decode_with_secret("secret", &token).unwrap()
    }

    #[tokio::test]
    async fn test_blacklist_with_cache() {
        let storage = storage().await;
        let cache = MokaCacheWrapper::with_settings(100, 60).unwrap();
        let student = user(&storage, "s@example.com", UserRole::Student).await;
        let claims = claims_for(student.id);

        assert!(
            !is_blacklisted(&storage, Some(&cache), &claims.jti)
                .await
                .unwrap()
        );
        assert!(blacklist(&storage, Some(&cache), &claims).await.unwrap());
        assert!(!blacklist(&storage, Some(&cache), &claims).await.unwrap());

        assert!(
            is_blacklisted(&storage, Some(&cache), &claims.jti)
                .await
                .unwrap()
        );
        // 缓存被清空后仍以数据库为准
        cache.invalidate_all().await;
        assert!(is_blacklisted(&storage, None, &claims.jti).await.unwrap());
    }
}
