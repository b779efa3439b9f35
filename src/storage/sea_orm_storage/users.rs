use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::{
    Page, PageRequest,
    users::{
        entities::User,
        requests::{CreateUserRequest, UserListQuery},
    },
};
use crate::utils::sql::contains_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(req.email),
            password_hash: Set(req.password_hash),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            role: Set(req.role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取用户
    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Users::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
        page: PageRequest,
    ) -> Result<Page<User>> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Email.like(contains_pattern(search)))
                    .add(Column::FirstName.like(contains_pattern(search)))
                    .add(Column::LastName.like(contains_pattern(search))),
            );
        }

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let users = self.fetch_page(select, page, "用户").await?;
        Ok(users.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{storage, user};
    use crate::models::PageRequest;
    use crate::models::users::{entities::UserRole, requests::UserListQuery};

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = storage().await;
        let created = user(&storage, "ada@example.com", UserRole::Teacher).await;

        let by_email = storage
            .get_user_by_email_impl("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.role, UserRole::Teacher);
        assert!(by_email.is_active);
        assert!(by_email.last_login.is_none());

        assert!(storage.update_last_login_impl(created.id).await.unwrap());
        let reloaded = storage.get_user_by_id_impl(created.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let storage = storage().await;
        user(&storage, "dup@example.com", UserRole::Student).await;

        let result = storage
            .create_user_impl(crate::models::users::requests::CreateUserRequest {
                email: "dup@example.com".into(),
                password_hash: "hash".into(),
                first_name: "A".into(),
                last_name: "B".into(),
                role: UserRole::Student,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_users_filters_and_paginates() {
        let storage = storage().await;
        user(&storage, "t1@example.com", UserRole::Teacher).await;
        user(&storage, "s1@example.com", UserRole::Student).await;
        user(&storage, "s2@example.com", UserRole::Student).await;

        let students = storage
            .list_users_with_pagination_impl(
                UserListQuery {
                    role: Some(UserRole::Student),
                    search: None,
                },
                PageRequest::new(1, 1),
            )
            .await
            .unwrap();
        assert_eq!(students.total, 2);
        assert_eq!(students.total_pages, 2);
        assert_eq!(students.items.len(), 1);

        let searched = storage
            .list_users_with_pagination_impl(
                UserListQuery {
                    role: None,
                    search: Some("t1@".into()),
                },
                PageRequest::new(1, 10),
            )
            .await
            .unwrap();
        assert_eq!(searched.total, 1);
        assert_eq!(searched.items[0].email, "t1@example.com");
    }
}
