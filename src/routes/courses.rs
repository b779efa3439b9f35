use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::services::CourseService;
use crate::utils::SafePathIds;

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(&req, body.into_inner()).await
}

pub async fn get_course(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, ids.course_id()).await
}

pub async fn update_course(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, ids.course_id(), body.into_inner())
        .await
}

pub async fn delete_course(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, ids.course_id()).await
}

pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_courses))
                    .route(web::post().to(create_course)),
            )
            .service(
                web::resource("/{course_id}")
                    .route(web::get().to(get_course))
                    .route(web::put().to(update_course))
                    .route(web::patch().to(update_course))
                    .route(web::delete().to(delete_course)),
            ),
    );
}
