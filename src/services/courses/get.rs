use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, list_item};
use crate::models::ApiResponse;
use crate::models::courses::responses::CourseDetail;
use crate::services::access::resolve_course;
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;

pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let detail = course_detail(storage.as_ref(), course_id, user.id).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Course retrieved successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn course_detail(
    storage: &dyn Storage,
    course_id: i64,
    user_id: i64,
) -> ServiceResult<CourseDetail> {
    resolve_course(storage, course_id, user_id).await?;
    let course = storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(crate::services::access::course_not_found)?;

    let teachers = storage.list_course_teachers(course_id).await?;
    let students = storage.list_course_students(course_id).await?;

    Ok(CourseDetail {
        course: list_item(storage, course).await?,
        teachers: teachers.iter().map(|u| u.summary()).collect(),
        students: students.iter().map(|u| u.summary()).collect(),
    })
}
