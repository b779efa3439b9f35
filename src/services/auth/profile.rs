use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::auth::UserInfoResponse;
use crate::services::{current_user, respond};

/// 返回中间件写入的当前用户
pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(current_user(request).map(|user| {
        HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::HttpMessage;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    use crate::models::users::entities::{User, UserRole};

    #[tokio::test]
    async fn test_me_requires_user() {
        let request = TestRequest::default().to_http_request();
        let response = handle_me(&request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_user() {
        let request = TestRequest::default().to_http_request();
        request.extensions_mut().insert(User {
            id: 7,
            email: "s@example.com".into(),
            password_hash: "hash".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            role: UserRole::Student,
            is_active: true,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        });

        let response = handle_me(&request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["data"]["user"]["email"], "s@example.com");
        assert!(json["data"]["user"].get("password_hash").is_none());
    }
}
