use crate::models::grades::entities::{MAX_GRADE, MIN_GRADE};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::services::ServiceResult;
use crate::storage::Storage;

use super::{ValidationErrors, is_blank};

pub const ONLY_TEACHERS_CAN_GRADE: &str = "Only teachers can grade";
pub const GRADE_OUT_OF_RANGE: &str = "Grade must be between 0 and 100";
pub const ALREADY_GRADED: &str = "This submission has already been graded";
pub const COMMENT_CANT_BE_EMPTY: &str = "Comment cannot be empty";

fn check_range(errors: &mut ValidationErrors, grade: Option<f64>) {
    if let Some(value) = grade
        && !(MIN_GRADE..=MAX_GRADE).contains(&value)
    {
        errors.add("grade", GRADE_OUT_OF_RANGE);
    }
}

/// 评分：仅教师可评，分数在 [0, 100]，每份提交只能评一次
pub async fn validate_grade_creation(
    storage: &dyn Storage,
    submission: &Submission,
    grader: &User,
    grade: Option<f64>,
) -> ServiceResult<ValidationErrors> {
    if !grader.is_teacher() {
        return Ok(ValidationErrors::single(
            crate::models::NON_FIELD_ERRORS,
            ONLY_TEACHERS_CAN_GRADE,
        ));
    }

    let mut errors = ValidationErrors::new();
    check_range(&mut errors, grade);
    if storage
        .get_grade_by_submission_id(submission.id)
        .await?
        .is_some()
    {
        errors.non_field(ALREADY_GRADED);
    }

    Ok(errors)
}

pub fn validate_grade_update(grade: Option<f64>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_range(&mut errors, grade);
    errors
}

pub fn validate_comment(comment: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(comment) {
        errors.add("comment", COMMENT_CANT_BE_EMPTY);
    }
    errors
}
