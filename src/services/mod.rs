pub mod access;
pub mod auth;
pub mod courses;
pub mod grades;
pub mod homeworks;
pub mod lectures;
pub mod submissions;
pub mod users;
pub mod validation;

pub use auth::AuthService;
pub use courses::CourseService;
pub use grades::GradeService;
pub use homeworks::HomeworkService;
pub use lectures::LectureService;
pub use submissions::SubmissionService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use serde::Serialize;
use std::sync::Arc;
use ts_rs::TS;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode, Page, PageRequest, PaginatedResponse, PaginationQuery};
use crate::storage::Storage;

use validation::ValidationErrors;

/// 业务层错误，最终统一转换成 `ApiResponse` 信封
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationErrors),
    BadRequest(ErrorCode, String),
    Unauthorized(ErrorCode, String),
    Forbidden(ErrorCode, String),
    NotFound(ErrorCode, String),
    Internal(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(ErrorCode::Forbidden, message.into())
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError::NotFound(code, message.into())
    }

    /// 单条字段错误
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ServiceError::Validation(ValidationErrors::single(field, message))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::BadRequest(..) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(..) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(..) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(..) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let status = self.status();
        match self {
            ServiceError::Validation(errors) => {
                let message = errors
                    .first_message()
                    .unwrap_or("Validation failed")
                    .to_string();
                HttpResponse::build(status).json(ApiResponse::error(
                    ErrorCode::ValidationFailed,
                    errors.into_field_errors(),
                    message,
                ))
            }
            ServiceError::BadRequest(code, message)
            | ServiceError::Unauthorized(code, message)
            | ServiceError::Forbidden(code, message)
            | ServiceError::NotFound(code, message) => {
                HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
            }
            ServiceError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                HttpResponse::build(status).json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error",
                ))
            }
        }
    }
}

impl From<LmsError> for ServiceError {
    fn from(err: LmsError) -> Self {
        ServiceError::Internal(err.format_simple())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

/// 把业务结果交回 actix，错误一律转成带信封的响应
pub(crate) fn respond(result: ServiceResult<HttpResponse>) -> ActixResult<HttpResponse> {
    Ok(result.unwrap_or_else(ServiceError::into_response))
}

/// 从 app_data 取存储
pub(crate) fn storage_from_request(request: &HttpRequest) -> ServiceResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ServiceError::Internal("Storage not found in app data".to_string()))
}

/// 缓存是可选的，未配置时返回 None
pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 当前登录用户，由 RequireJWT 写入请求扩展
pub(crate) fn current_user(request: &HttpRequest) -> ServiceResult<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        ServiceError::Unauthorized(
            ErrorCode::Unauthorized,
            "Authentication credentials were not provided".to_string(),
        )
    })
}

pub(crate) fn page_request(query: &PaginationQuery) -> PageRequest {
    query.resolve(&AppConfig::get().pagination)
}

/// 分页结果包成 200 响应，上一页/下一页链接基于当前请求路径
pub(crate) fn paginated_response<T>(
    request: &HttpRequest,
    page: Page<T>,
    message: &str,
) -> HttpResponse
where
    T: Serialize + TS,
{
    let data = PaginatedResponse::from_page(page, request.path(), request.query_string());
    HttpResponse::Ok().json(ApiResponse::success(data, message))
}

/// 各业务服务共用的存储获取逻辑
macro_rules! impl_service_storage {
    ($service:ident) => {
        impl $service {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            /// 测试时直接注入存储
            #[allow(dead_code)]
            pub fn with_storage(storage: std::sync::Arc<dyn crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> crate::services::ServiceResult<std::sync::Arc<dyn crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => crate::services::storage_from_request(request),
                }
            }
        }
    };
}

pub(crate) use impl_service_storage;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let mut errors = ValidationErrors::new();
        errors.add("password_confirm", "Passwords do not match");
        let response = ServiceError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], ErrorCode::ValidationFailed as i32);
        assert_eq!(json["message"], "Passwords do not match");
        assert_eq!(json["data"]["password_confirm"][0], "Passwords do not match");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let response = ServiceError::forbidden("Only the primary owner can perform this action")
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["code"], ErrorCode::Forbidden as i32);
        assert!(json.get("data").is_none());

        let response =
            ServiceError::not_found(ErrorCode::CourseNotFound, "Course does not exist").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ServiceError::from(LmsError::database_operation("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Internal server error");
    }
}
