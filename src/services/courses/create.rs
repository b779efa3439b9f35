use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, list_item};
use crate::models::ApiResponse;
use crate::models::courses::requests::{CreateCourseRequest, NewCourse};
use crate::models::courses::responses::CourseListItem;
use crate::models::users::entities::User;
use crate::services::validation::courses::{CourseDraft, validate_course_creation};
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    body: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let item = create(storage.as_ref(), &user, body).await?;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                item,
                "Course created successfully",
            )))
        }
        .await,
    )
}

/// 校验通过后课程与成员关系在同一事务中写入
pub(crate) async fn create(
    storage: &dyn Storage,
    user: &User,
    body: CreateCourseRequest,
) -> ServiceResult<CourseListItem> {
    let name = body.name.trim();
    validate_course_creation(
        storage,
        &CourseDraft {
            name,
            primary_owner_id: user.id,
            teacher_ids: &body.teacher_ids,
            student_ids: &body.student_ids,
        },
    )
    .await?
    .into_result()?;

    let course = storage
        .create_course(NewCourse {
            name: name.to_string(),
            description: body.description.trim().to_string(),
            primary_owner_id: user.id,
            teacher_ids: body.teacher_ids,
            student_ids: body.student_ids,
        })
        .await?;
    info!("Course {} created by user {}", course.id, user.id);

    list_item(storage, course).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NON_FIELD_ERRORS;
    use crate::models::users::entities::UserRole;
    use crate::services::ServiceError;
    use crate::services::validation::courses::COURSE_ALREADY_EXISTS;
    use crate::storage::sea_orm_storage::test_support::{storage, user};

    fn request(name: &str, teacher_ids: Vec<i64>, student_ids: Vec<i64>) -> CreateCourseRequest {
        CreateCourseRequest {
            name: name.into(),
            description: "Ownership and borrowing".into(),
            teacher_ids,
            student_ids,
        }
    }

    #[tokio::test]
    async fn test_create_course() {
        let storage = storage().await;
        let owner = user(&storage, "owner@example.com", UserRole::Teacher).await;
        let assistant = user(&storage, "a@example.com", UserRole::Teacher).await;
        let student = user(&storage, "s@example.com", UserRole::Student).await;

        let item = create(
            &storage,
            &owner,
            request(" Rust ", vec![assistant.id], vec![student.id]),
        )
        .await
        .unwrap();
        assert_eq!(item.name, "Rust");
        assert_eq!(item.primary_owner.id, owner.id);
        assert_eq!((item.teacher_count, item.student_count), (1, 1));

        match create(&storage, &owner, request("Rust", vec![], vec![])).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.field(NON_FIELD_ERRORS), [COURSE_ALREADY_EXISTS])
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_student_cannot_own_course() {
        let storage = storage().await;
        let student = user(&storage, "s@example.com", UserRole::Student).await;

        match create(&storage, &student, request("Rust", vec![], vec![])).await {
            Err(ServiceError::Validation(errors)) => assert_eq!(
                errors.field(NON_FIELD_ERRORS),
                ["Primary owner: User must be teacher"]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
