use crate::models::courses::entities::CourseAccess;
use crate::models::homeworks::entities::Homework;
use crate::models::users::entities::User;
use crate::services::ServiceResult;
use crate::storage::Storage;

use super::{ValidationErrors, is_blank};

pub const USER_MUST_BE_STUDENT: &str = "User must be student";
pub const STUDENT_NOT_ENROLLED: &str = "Student is not enrolled in this course";
pub const CONTENT_CANT_BE_EMPTY: &str = "Content cannot be empty";
pub const ALREADY_SUBMITTED: &str = "You have already submitted this homework";

/// 提交作业：角色与选课不满足时立即返回，其余错误一并收集
pub async fn validate_submission_creation(
    storage: &dyn Storage,
    access: &CourseAccess,
    homework: &Homework,
    student: &User,
    content: &str,
) -> ServiceResult<ValidationErrors> {
    if !student.is_student() {
        return Ok(ValidationErrors::single(
            crate::models::NON_FIELD_ERRORS,
            USER_MUST_BE_STUDENT,
        ));
    }
    if !access.is_student {
        return Ok(ValidationErrors::single(
            crate::models::NON_FIELD_ERRORS,
            STUDENT_NOT_ENROLLED,
        ));
    }

    let mut errors = ValidationErrors::new();
    if is_blank(content) {
        errors.add("content", CONTENT_CANT_BE_EMPTY);
    }
    if storage.submission_exists(homework.id, student.id).await? {
        errors.non_field(ALREADY_SUBMITTED);
    }

    Ok(errors)
}

pub fn validate_submission_update(content: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if content.is_some_and(is_blank) {
        errors.add("content", CONTENT_CANT_BE_EMPTY);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NON_FIELD_ERRORS;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage, user};

    #[tokio::test]
    async fn test_submission_creation_rules() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let student = &room.students[0];
        let outsider = user(&storage, "outsider@example.com", UserRole::Student).await;

        let access = storage
            .get_course_access_impl(room.course.id, student.id)
            .await
            .unwrap()
            .unwrap();
        let errors =
            validate_submission_creation(&storage, &access, &room.homework, student, "answer")
                .await
                .unwrap();
        assert!(errors.is_empty());

        let errors =
            validate_submission_creation(&storage, &access, &room.homework, &room.teacher, "x")
                .await
                .unwrap();
        assert_eq!(errors.field(NON_FIELD_ERRORS), [USER_MUST_BE_STUDENT]);

        let outsider_access = storage
            .get_course_access_impl(room.course.id, outsider.id)
            .await
            .unwrap()
            .unwrap();
        let errors = validate_submission_creation(
            &storage,
            &outsider_access,
            &room.homework,
            &outsider,
            "answer",
        )
        .await
        .unwrap();
        assert_eq!(errors.field(NON_FIELD_ERRORS), [STUDENT_NOT_ENROLLED]);

        storage
            .create_submission_impl(room.homework.id, student.id, "answer")
            .await
            .unwrap();
        let errors = validate_submission_creation(&storage, &access, &room.homework, student, " ")
            .await
            .unwrap();
        assert_eq!(errors.field("content"), [CONTENT_CANT_BE_EMPTY]);
        assert_eq!(errors.field(NON_FIELD_ERRORS), [ALREADY_SUBMITTED]);
    }

    #[test]
    fn test_submission_update_rules() {
        assert!(validate_submission_update(None).is_empty());
        assert!(validate_submission_update(Some("v2")).is_empty());
        assert_eq!(
            validate_submission_update(Some("")).field("content"),
            [CONTENT_CANT_BE_EMPTY]
        );
    }
}
