use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::users::entities::User;
use crate::services::access::{course_not_found, require_primary_owner, resolve_course};
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;

pub async fn delete_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            delete(storage.as_ref(), &user, course_id).await?;
            Ok(HttpResponse::NoContent().finish())
        }
        .await,
    )
}

/// 课时、作业、提交、评分随课程级联删除
pub(crate) async fn delete(storage: &dyn Storage, user: &User, course_id: i64) -> ServiceResult<()> {
    let access = resolve_course(storage, course_id, user.id).await?;
    require_primary_owner(&access, user)?;

    if !storage.delete_course(course_id).await? {
        return Err(course_not_found());
    }
    info!("Course {} deleted by user {}", course_id, user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::services::ServiceError;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    #[tokio::test]
    async fn test_delete_course_cascades() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let student = &room.students[0];

        assert!(matches!(
            delete(&storage, student, room.course.id).await,
            Err(ServiceError::Forbidden(..))
        ));

        delete(&storage, &room.teacher, room.course.id).await.unwrap();
        assert!(storage.get_course_by_id(room.course.id).await.unwrap().is_none());
        assert!(storage.get_lecture_by_id(room.lecture.id).await.unwrap().is_none());
        assert!(storage.get_homework_by_id(room.homework.id).await.unwrap().is_none());

        assert!(matches!(
            delete(&storage, &room.teacher, room.course.id).await,
            Err(ServiceError::NotFound(ErrorCode::CourseNotFound, _))
        ));
    }
}
