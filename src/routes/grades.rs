use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::grade_comments::requests::CreateGradeCommentRequest;
use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
use crate::services::GradeService;
use crate::utils::SafePathIds;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(
    req: HttpRequest,
    ids: SafePathIds,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(&req, ids, query.into_inner()).await
}

pub async fn create_grade(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.create_grade(&req, ids, body.into_inner()).await
}

pub async fn get_grade(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_grade(&req, ids).await
}

pub async fn update_grade(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.update_grade(&req, ids, body.into_inner()).await
}

pub async fn delete_grade(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.delete_grade(&req, ids).await
}

pub async fn list_comments(
    req: HttpRequest,
    ids: SafePathIds,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_comments(&req, ids, query.into_inner()).await
}

pub async fn create_comment(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<CreateGradeCommentRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.create_comment(&req, ids, body.into_inner()).await
}

pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(
            "/api/v1/courses/{course_id}/lectures/{lecture_id}/homeworks/{homework_id}/submissions/{submission_id}/grades",
        )
        .wrap(middlewares::RequireJWT)
        .service(
            web::resource("")
                .route(web::get().to(list_grades))
                .route(web::post().to(create_grade)),
        )
        .service(
            web::resource("/{grade_id}")
                .route(web::get().to(get_grade))
                .route(web::put().to(update_grade))
                .route(web::patch().to(update_grade))
                .route(web::delete().to(delete_grade)),
        )
        .service(
            web::resource("/{grade_id}/comments")
                .route(web::get().to(list_comments))
                .route(web::post().to(create_comment)),
        ),
    );
}
