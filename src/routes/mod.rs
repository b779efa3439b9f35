pub mod auth;
pub mod courses;
pub mod grades;
pub mod homeworks;
pub mod lectures;
pub mod submissions;
pub mod users;

pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use grades::configure_grade_routes;
pub use homeworks::configure_homework_routes;
pub use lectures::configure_lecture_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部路由
///
/// actix 的 scope 按前缀匹配且不会回退，嵌套层级更深的 scope 必须先注册。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_grade_routes(cfg);
    configure_submission_routes(cfg);
    configure_homework_routes(cfg);
    configure_lecture_routes(cfg);
    configure_course_routes(cfg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test::{self, TestRequest};
    use actix_web::{App, web};
    use std::sync::Arc;

    use crate::models::users::entities::{User, UserRole};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{Classroom, classroom, storage};
    use crate::utils::jwt::JwtUtils;

    fn bearer(user: &User) -> (actix_web::http::header::HeaderName, String) {
        let token = JwtUtils::generate_access_token(user.id, user.role).unwrap();
        (AUTHORIZATION, format!("Bearer {token}"))
    }

    async fn setup() -> (Arc<dyn Storage>, Classroom) {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        (Arc::new(storage), room)
    }

    #[tokio::test]
    async fn test_nested_scopes_reach_their_handlers() {
        let (storage, room) = setup().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_routes),
        )
        .await;

        let course = room.course.id;
        let lecture = room.lecture.id;
        let homework = room.homework.id;
        let paths = [
            format!("/api/v1/courses/{course}"),
            format!("/api/v1/courses/{course}/lectures"),
            format!("/api/v1/courses/{course}/lectures/{lecture}/homeworks"),
            format!("/api/v1/courses/{course}/lectures/{lecture}/homeworks/{homework}/submissions"),
        ];
        for path in paths {
            let req = TestRequest::get()
                .uri(&path)
                .insert_header(bearer(&room.teacher))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (storage, room) = setup().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = TestRequest::get()
            .uri(&format!("/api/v1/courses/{}/lectures", room.course.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = TestRequest::get()
            .uri("/api/v1/users/abc")
            .insert_header(bearer(&room.teacher))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_student_cannot_create_homework() {
        let (storage, room) = setup().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = TestRequest::post()
            .uri(&format!(
                "/api/v1/courses/{}/lectures/{}/homeworks",
                room.course.id, room.lecture.id
            ))
            .insert_header(bearer(&room.students[0]))
            .set_json(serde_json::json!({
                "title": "Borrowing",
                "description": "",
                "due_date": "2030-01-01T00:00:00Z"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User must be teacher");
    }
}
