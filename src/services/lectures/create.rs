use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::LectureService;
use crate::models::ApiResponse;
use crate::models::lectures::entities::Lecture;
use crate::models::lectures::requests::CreateLectureRequest;
use crate::models::users::entities::User;
use crate::services::access::{require_course_manager, resolve_course};
use crate::services::validation::lectures::validate_topic;
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;

pub async fn create_lecture(
    service: &LectureService,
    request: &HttpRequest,
    course_id: i64,
    body: CreateLectureRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let lecture = create(storage.as_ref(), &user, course_id, body).await?;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                lecture,
                "Lecture created successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn create(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    body: CreateLectureRequest,
) -> ServiceResult<Lecture> {
    let access = resolve_course(storage, course_id, user.id).await?;
    require_course_manager(&access, user)?;

    let topic = body.topic.trim();
    validate_topic(storage, course_id, topic, None)
        .await?
        .into_result()?;

    let lecture = storage.create_lecture(course_id, topic).await?;
    info!("Lecture {} created in course {}", lecture.id, course_id);
    Ok(lecture)
}
