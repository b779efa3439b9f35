use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, submission_response};
use crate::models::ApiResponse;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::users::entities::User;
use crate::services::access::resolve_homework;
use crate::services::validation::submissions::validate_submission_creation;
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    ids: SafePathIds,
    body: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let response = create(storage.as_ref(), &user, &ids, body).await?;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                response,
                "Homework submitted successfully",
            )))
        }
        .await,
    )
}

pub(crate) async fn create(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    body: CreateSubmissionRequest,
) -> ServiceResult<SubmissionResponse> {
    let ctx = resolve_homework(
        storage,
        ids.course_id(),
        ids.lecture_id(),
        ids.homework_id(),
        user.id,
    )
    .await?;

    validate_submission_creation(storage, &ctx.access, &ctx.homework, user, &body.content)
        .await?
        .into_result()?;

    let submission = storage
        .create_submission(ctx.homework.id, user.id, &body.content)
        .await?;
    info!(
        "Submission {} created for homework {} by student {}",
        submission.id, ctx.homework.id, user.id
    );

    submission_response(storage, &ctx.homework, submission).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NON_FIELD_ERRORS;
    use crate::models::users::entities::UserRole;
    use crate::services::ServiceError;
    use crate::services::validation::submissions::{
        ALREADY_SUBMITTED, STUDENT_NOT_ENROLLED, USER_MUST_BE_STUDENT,
    };
    use crate::storage::sea_orm_storage::test_support::{classroom, storage, user};

    fn body(content: &str) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            content: content.into(),
        }
    }

    fn non_field(result: ServiceResult<SubmissionResponse>) -> Vec<String> {
        match result {
            Err(ServiceError::Validation(errors)) => errors.field(NON_FIELD_ERRORS).to_vec(),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_once() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let student = &room.students[0];
        let path = SafePathIds::from_ids([
            ("course_id", room.course.id),
            ("lecture_id", room.lecture.id),
            ("homework_id", room.homework.id),
        ]);

        let response = create(&storage, student, &path, body("fn main() {}"))
            .await
            .unwrap();
        assert!(response.is_submitted);
        assert_eq!(response.student.id, student.id);
        assert_eq!(response.homework.id, room.homework.id);

        assert_eq!(
            non_field(create(&storage, student, &path, body("again")).await),
            [ALREADY_SUBMITTED]
        );
    }

    #[tokio::test]
    async fn test_only_enrolled_students_submit() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let outsider = user(&storage, "outsider@example.com", UserRole::Student).await;
        let path = SafePathIds::from_ids([
            ("course_id", room.course.id),
            ("lecture_id", room.lecture.id),
            ("homework_id", room.homework.id),
        ]);

        assert_eq!(
            non_field(create(&storage, &room.teacher, &path, body("answer")).await),
            [USER_MUST_BE_STUDENT]
        );
        assert_eq!(
            non_field(create(&storage, &outsider, &path, body("answer")).await),
            [STUDENT_NOT_ENROLLED]
        );
    }
}
