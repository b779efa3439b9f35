use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradeService, grade_response};
use crate::models::ApiResponse;
use crate::models::grades::requests::CreateGradeRequest;
use crate::models::grades::responses::GradeResponse;
use crate::models::users::entities::User;
use crate::services::access::{require_course_manager, resolve_submission};
use crate::services::validation::grades::validate_grade_creation;
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn create_grade(
    service: &GradeService,
    request: &HttpRequest,
    ids: SafePathIds,
    body: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let response = create(storage.as_ref(), &user, &ids, body).await?;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                response,
                "Submission graded successfully",
            )))
        }
        .await,
    )
}

/// 学生走校验错误（400），课程外的教师是权限错误（403）
pub(crate) async fn create(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    body: CreateGradeRequest,
) -> ServiceResult<GradeResponse> {
    let ctx = resolve_submission(storage, ids, user.id).await?;
    if user.is_teacher() {
        require_course_manager(&ctx.access, user)?;
    }
    validate_grade_creation(storage, &ctx.submission, user, body.grade)
        .await?
        .into_result()?;

    let grade = storage
        .create_grade(ctx.submission.id, body.grade, body.comments.trim(), user.id)
        .await?;
    info!(
        "Submission {} graded by teacher {}",
        ctx.submission.id, user.id
    );

    grade_response(storage, &ctx.homework, ctx.submission, grade).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::models::{ErrorCode, NON_FIELD_ERRORS};
    use crate::services::ServiceError;
    use crate::services::grades::test_paths::submission_path;
    use crate::services::validation::grades::{
        ALREADY_GRADED, GRADE_OUT_OF_RANGE, ONLY_TEACHERS_CAN_GRADE,
    };
    use crate::storage::sea_orm_storage::test_support::{classroom, storage, user};

    fn body(grade: Option<f64>) -> CreateGradeRequest {
        CreateGradeRequest {
            grade,
            comments: "Solid work".into(),
        }
    }

    #[tokio::test]
    async fn test_create_grade() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let submission = storage
            .create_submission(room.homework.id, room.students[0].id, "answer")
            .await
            .unwrap();
        let path = submission_path(&room, submission.id, None);

        match create(&storage, &room.teacher, &path, body(Some(120.0))).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.field("grade"), [GRADE_OUT_OF_RANGE])
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let response = create(&storage, &room.teacher, &path, body(Some(88.456)))
            .await
            .unwrap();
        assert_eq!(response.grade, Some(88.46));
        assert_eq!(response.comments, "Solid work");

        match create(&storage, &room.teacher, &path, body(Some(90.0))).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.field(NON_FIELD_ERRORS), [ALREADY_GRADED])
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_grader_must_teach_course() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let student = &room.students[0];
        let submission = storage
            .create_submission(room.homework.id, student.id, "answer")
            .await
            .unwrap();
        let path = submission_path(&room, submission.id, None);

        match create(&storage, student, &path, body(Some(100.0))).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.field(NON_FIELD_ERRORS), [ONLY_TEACHERS_CAN_GRADE])
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let outsider = user(&storage, "other@example.com", UserRole::Teacher).await;
        assert!(matches!(
            create(&storage, &outsider, &path, body(Some(100.0))).await,
            Err(ServiceError::Forbidden(ErrorCode::CoursePermissionDenied, _))
        ));

        let missing = submission_path(&room, 9999, None);
        assert!(matches!(
            create(&storage, &room.teacher, &missing, body(None)).await,
            Err(ServiceError::NotFound(ErrorCode::SubmissionNotFound, _))
        ));
    }
}
