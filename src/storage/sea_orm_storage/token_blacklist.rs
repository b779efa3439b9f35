use super::SeaOrmStorage;
use crate::entity::token_blacklist::{ActiveModel, Column, Entity as TokenBlacklist};
use crate::errors::{LmsError, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 将令牌加入黑名单，重复加入时返回 false
    ///
    /// 依赖 jti 唯一索引与 ON CONFLICT DO NOTHING，并发拉黑同一令牌也不会报错
    pub async fn blacklist_token_impl(
        &self,
        jti: &str,
        user_id: i64,
        token_type: &str,
        expires_at: i64,
    ) -> Result<bool> {
        let model = ActiveModel {
            jti: Set(jti.to_string()),
            user_id: Set(user_id),
            token_type: Set(token_type.to_string()),
            expires_at: Set(expires_at),
            blacklisted_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = TokenBlacklist::insert(model)
            .on_conflict(OnConflict::column(Column::Jti).do_nothing().to_owned())
            .exec(&self.db)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => {
                // 部分后端在 DO NOTHING 命中时返回其他形式的错误
                let message = e.to_string().to_lowercase();
                if message.contains("no rows") || message.contains("record not inserted") {
                    Ok(false)
                } else {
                    Err(LmsError::database_operation(format!("加入令牌黑名单失败: {e}")))
                }
            }
        }
    }

    /// 令牌是否已被拉黑
    pub async fn is_token_blacklisted_impl(&self, jti: &str) -> Result<bool> {
        let count = TokenBlacklist::find()
            .filter(Column::Jti.eq(jti))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询令牌黑名单失败: {e}")))?;

        Ok(count > 0)
    }

    /// 删除已过期的黑名单记录
    pub async fn purge_expired_blacklisted_tokens_impl(&self, now: i64) -> Result<u64> {
        let result = TokenBlacklist::delete_many()
            .filter(Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("清理令牌黑名单失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{storage, user};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_blacklist_is_idempotent() {
        let storage = storage().await;
        let owner = user(&storage, "s@example.com", UserRole::Student).await;
        let exp = chrono::Utc::now().timestamp() + 3600;

        assert!(!storage.is_token_blacklisted_impl("jti-1").await.unwrap());
        assert!(
            storage
                .blacklist_token_impl("jti-1", owner.id, "refresh", exp)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .blacklist_token_impl("jti-1", owner.id, "refresh", exp)
                .await
                .unwrap()
        );
        assert!(storage.is_token_blacklisted_impl("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let storage = storage().await;
        let owner = user(&storage, "s@example.com", UserRole::Student).await;
        let now = chrono::Utc::now().timestamp();

        storage
            .blacklist_token_impl("old", owner.id, "access", now - 10)
            .await
            .unwrap();
        storage
            .blacklist_token_impl("fresh", owner.id, "access", now + 600)
            .await
            .unwrap();

        assert_eq!(
            storage
                .purge_expired_blacklisted_tokens_impl(now)
                .await
                .unwrap(),
            1
        );
        assert!(!storage.is_token_blacklisted_impl("old").await.unwrap());
        assert!(storage.is_token_blacklisted_impl("fresh").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_blacklist_inserts_once() {
        let storage = storage().await;
        let owner = user(&storage, "s@example.com", UserRole::Student).await;
        let exp = chrono::Utc::now().timestamp() + 3600;

        let (a, b) = tokio::join!(
            storage.blacklist_token_impl("jti-race", owner.id, "refresh", exp),
            storage.blacklist_token_impl("jti-race", owner.id, "refresh", exp),
        );
        let inserted = [a.unwrap(), b.unwrap()];
        assert_eq!(inserted.iter().filter(|ok| **ok).count(), 1);
        assert!(storage.is_token_blacklisted_impl("jti-race").await.unwrap());
    }
}
