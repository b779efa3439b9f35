use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, list_item};
use crate::models::ApiResponse;
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::courses::responses::CourseListItem;
use crate::models::users::entities::User;
use crate::services::access::{course_not_found, require_primary_owner, resolve_course};
use crate::services::validation::courses::validate_course_update;
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;

/// PUT 与 PATCH 共用，只修改请求中出现的字段
pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    body: UpdateCourseRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let item = update(storage.as_ref(), &user, course_id, body).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                item,
                "Course updated successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn update(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    mut body: UpdateCourseRequest,
) -> ServiceResult<CourseListItem> {
    let access = resolve_course(storage, course_id, user.id).await?;
    require_primary_owner(&access, user)?;

    let course = storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(course_not_found)?;

    body.name = body.name.map(|name| name.trim().to_string());
    body.description = body.description.map(|d| d.trim().to_string());
    validate_course_update(storage, &course, &body)
        .await?
        .into_result()?;

    let course = storage
        .update_course(course_id, body)
        .await?
        .ok_or_else(course_not_found)?;
    info!("Course {} updated by user {}", course.id, user.id);

    list_item(storage, course).await
}
