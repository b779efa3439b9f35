pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::UserListParams;
use crate::storage::Storage;

use super::impl_service_storage;

/// 用户只读接口
pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl_service_storage!(UserService);

impl UserService {
    // 获取用户列表
    pub async fn list_users(
        &self,
        request: &HttpRequest,
        query: UserListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, request, query).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        get::get_user(self, request, user_id).await
    }
}
