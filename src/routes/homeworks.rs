use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::homeworks::requests::{CreateHomeworkRequest, UpdateHomeworkRequest};
use crate::models::users::entities::UserRole;
use crate::services::HomeworkService;
use crate::utils::SafePathIds;

// 懒加载的全局 HomeworkService 实例
static HOMEWORK_SERVICE: Lazy<HomeworkService> = Lazy::new(HomeworkService::new_lazy);

pub async fn list_homeworks(
    req: HttpRequest,
    ids: SafePathIds,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .list_homeworks(&req, ids, query.into_inner())
        .await
}

pub async fn create_homework(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<CreateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .create_homework(&req, ids, body.into_inner())
        .await
}

pub async fn get_homework(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE.get_homework(&req, ids).await
}

pub async fn update_homework(
    req: HttpRequest,
    ids: SafePathIds,
    body: web::Json<UpdateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .update_homework(&req, ids, body.into_inner())
        .await
}

pub async fn delete_homework(req: HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE.delete_homework(&req, ids).await
}

pub fn configure_homework_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/lectures/{lecture_id}/homeworks")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_homeworks))
                    .route(
                        web::post()
                            .to(create_homework)
                            .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
                    ),
            )
            .service(
                web::resource("/{homework_id}")
                    .route(web::get().to(get_homework))
                    .route(
                        web::put()
                            .to(update_homework)
                            .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
                    )
                    .route(
                        web::patch()
                            .to(update_homework)
                            .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
                    )
                    .route(
                        web::delete()
                            .to(delete_homework)
                            .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
                    ),
            ),
    );
}
