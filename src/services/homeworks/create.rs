use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{HomeworkService, homework_response};
use crate::models::ApiResponse;
use crate::models::homeworks::requests::{CreateHomeworkRequest, NewHomework};
use crate::models::homeworks::responses::HomeworkResponse;
use crate::models::users::entities::User;
use crate::services::access::{USER_MUST_BE_TEACHER, require_course_manager, resolve_lecture};
use crate::services::validation::homeworks::validate_title;
use crate::services::{ServiceError, ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn create_homework(
    service: &HomeworkService,
    request: &HttpRequest,
    ids: SafePathIds,
    body: CreateHomeworkRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let response =
                create(storage.as_ref(), &user, ids.course_id(), ids.lecture_id(), body).await?;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                response,
                "Homework created successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn create(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    lecture_id: i64,
    body: CreateHomeworkRequest,
) -> ServiceResult<HomeworkResponse> {
    let ctx = resolve_lecture(storage, course_id, lecture_id, user.id).await?;
    if !user.is_teacher() {
        return Err(ServiceError::forbidden(USER_MUST_BE_TEACHER));
    }
    require_course_manager(&ctx.access, user)?;

    let title = body.title.trim();
    validate_title(storage, lecture_id, title, None)
        .await?
        .into_result()?;

    let homework = storage
        .create_homework(NewHomework {
            lecture_id,
            title: title.to_string(),
            description: body.description.trim().to_string(),
            due_date: body.due_date,
            created_by: user.id,
        })
        .await?;
    info!("Homework {} created in lecture {}", homework.id, lecture_id);

    homework_response(storage, &ctx.lecture, homework).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage, user};

    fn request(title: &str) -> CreateHomeworkRequest {
        CreateHomeworkRequest {
            title: title.into(),
            description: "Write a tiny executor".into(),
            due_date: chrono::Utc::now() + chrono::Duration::days(7),
        }
    }

    #[tokio::test]
    async fn test_create_homework() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;

        let response = create(
            &storage,
            &room.teacher,
            room.course.id,
            room.lecture.id,
            request("Waker"),
        )
        .await
        .unwrap();
        assert_eq!(response.title, "Waker");
        assert_eq!(response.lecture.id, room.lecture.id);
        assert_eq!(response.created_by.id, room.teacher.id);

        match create(
            &storage,
            &room.teacher,
            room.course.id,
            room.lecture.id,
            request("Executor"),
        )
        .await
        {
            Err(ServiceError::Validation(errors)) => assert_eq!(
                errors.field("title"),
                ["A homework with title 'Executor' already exists in this lecture"]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_homework_guards() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let outsider = user(&storage, "other@example.com", UserRole::Teacher).await;

        assert!(matches!(
            create(
                &storage,
                &room.students[0],
                room.course.id,
                room.lecture.id,
                request("Pin"),
            )
            .await,
            Err(ServiceError::Forbidden(ErrorCode::Forbidden, ref msg)) if msg == USER_MUST_BE_TEACHER
        ));
        assert!(matches!(
            create(&storage, &outsider, room.course.id, room.lecture.id, request("Pin")).await,
            Err(ServiceError::Forbidden(ErrorCode::CoursePermissionDenied, _))
        ));
        assert!(matches!(
            create(&storage, &room.teacher, room.course.id, 9999, request("Pin")).await,
            Err(ServiceError::NotFound(ErrorCode::LectureNotFound, _))
        ));
    }
}
