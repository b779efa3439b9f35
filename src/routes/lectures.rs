use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::lectures::requests::{CreateLectureRequest, UpdateLectureRequest};
use crate::services::LectureService;
use crate::utils::SafePathIds;

// 懒加载的全局 LectureService 实例
static LECTURE_SERVICE: Lazy<LectureService> = Lazy::new(LectureService::new_lazy);

pub async fn list_lectures(
    req: HttpRequest,
    ids: SafePathIds,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE
        .list_lectures(&req, ids.course_id(), query.into_inner())
        .await
}

pub async fn create_lecture(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<CreateLectureRequest>,
) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE
        .create_lecture(&req, ids.course_id(), body.into_inner())
        .await
}

pub async fn get_lecture(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE
        .get_lecture(&req, ids.course_id(), ids.lecture_id())
        .await
}

pub async fn update_lecture(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<UpdateLectureRequest>,
) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE
        .update_lecture(&req, ids.course_id(), ids.lecture_id(), body.into_inner())
        .await
}

pub async fn delete_lecture(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE
        .delete_lecture(&req, ids.course_id(), ids.lecture_id())
        .await
}

pub async fn upload_presentation(
    req: HttpRequest,
    ids: SafePathIds,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE
        .upload_presentation(&req, ids.course_id(), ids.lecture_id(), payload)
        .await
}

pub fn configure_lecture_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/lectures")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_lectures))
                    .route(web::post().to(create_lecture)),
            )
            .service(
                web::resource("/{lecture_id}")
                    .route(web::get().to(get_lecture))
                    .route(web::put().to(update_lecture))
                    .route(web::patch().to(update_lecture))
                    .route(web::delete().to(delete_lecture)),
            )
            .service(
                web::resource("/{lecture_id}/presentation")
                    .route(web::post().to(upload_presentation)),
            ),
    );
}
