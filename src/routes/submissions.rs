use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::submissions::requests::{CreateSubmissionRequest, UpdateSubmissionRequest};
use crate::services::SubmissionService;
use crate::utils::SafePathIds;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn list_submissions(
    req: HttpRequest,
    ids: SafePathIds,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, ids, query.into_inner())
        .await
}

pub async fn create_submission(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, ids, body.into_inner())
        .await
}

pub async fn get_submission(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, ids).await
}

pub async fn update_submission(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<UpdateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_submission(&req, ids, body.into_inner())
        .await
}

pub async fn delete_submission(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.delete_submission(&req, ids).await
}

pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(
            "/api/v1/courses/{course_id}/lectures/{lecture_id}/homeworks/{homework_id}/submissions",
        )
        .wrap(middlewares::RequireJWT)
        .service(
            web::resource("")
                .route(web::get().to(list_submissions))
                .route(web::post().to(create_submission)),
        )
        .service(
            web::resource("/{submission_id}")
                .route(web::get().to(get_submission))
                .route(web::put().to(update_submission))
                .route(web::patch().to(update_submission))
                .route(web::delete().to(delete_submission)),
        ),
    );
}
