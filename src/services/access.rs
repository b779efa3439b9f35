//! 嵌套资源加载与权限守卫
//!
//! `/courses/{course_id}/lectures/{lecture_id}/homeworks/...` 这样的路径逐级加载，
//! 任意一级不存在或不属于上一级都返回 404。

use crate::models::ErrorCode;
use crate::models::courses::entities::CourseAccess;
use crate::models::grades::entities::Grade;
use crate::models::homeworks::entities::Homework;
use crate::models::lectures::entities::Lecture;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::storage::Storage;

use super::{ServiceError, ServiceResult};

pub const COURSE_ACCESS_DENIED: &str = "You don't have permission to manage this course";
pub const ONLY_PRIMARY_OWNER: &str = "Only the primary owner can perform this action";
pub const ONLY_GRADER: &str = "Only the grading teacher can modify this grade";
pub const USER_MUST_BE_TEACHER: &str = "User must be teacher";

pub struct LectureContext {
    pub access: CourseAccess,
    pub lecture: Lecture,
}

pub struct HomeworkContext {
    pub access: CourseAccess,
    pub lecture: Lecture,
    pub homework: Homework,
}

pub struct SubmissionContext {
    pub access: CourseAccess,
    pub homework: Homework,
    pub submission: Submission,
}

pub(crate) fn course_not_found() -> ServiceError {
    ServiceError::not_found(ErrorCode::CourseNotFound, "Course does not exist")
}

pub(crate) fn course_denied() -> ServiceError {
    ServiceError::Forbidden(
        ErrorCode::CoursePermissionDenied,
        COURSE_ACCESS_DENIED.to_string(),
    )
}

/// 课程存在时返回当前用户在课程中的身份
pub async fn resolve_course(
    storage: &dyn Storage,
    course_id: i64,
    user_id: i64,
) -> ServiceResult<CourseAccess> {
    storage
        .get_course_access(course_id, user_id)
        .await?
        .ok_or_else(course_not_found)
}

pub async fn resolve_lecture(
    storage: &dyn Storage,
    course_id: i64,
    lecture_id: i64,
    user_id: i64,
) -> ServiceResult<LectureContext> {
    let access = resolve_course(storage, course_id, user_id).await?;
    let lecture = storage
        .get_lecture_by_id(lecture_id)
        .await?
        .filter(|lecture| lecture.course_id == course_id)
        .ok_or_else(|| ServiceError::not_found(ErrorCode::LectureNotFound, "Lecture does not exist"))?;

    Ok(LectureContext { access, lecture })
}

pub async fn resolve_homework(
    storage: &dyn Storage,
    course_id: i64,
    lecture_id: i64,
    homework_id: i64,
    user_id: i64,
) -> ServiceResult<HomeworkContext> {
    let LectureContext { access, lecture } =
        resolve_lecture(storage, course_id, lecture_id, user_id).await?;
    let homework = storage
        .get_homework_by_id(homework_id)
        .await?
        .filter(|homework| homework.lecture_id == lecture_id)
        .ok_or_else(|| {
            ServiceError::not_found(ErrorCode::HomeworkNotFound, "Homework does not exist")
        })?;

    Ok(HomeworkContext {
        access,
        lecture,
        homework,
    })
}

/// 提交在作业下查找，找不到时返回 None，由调用方决定 404 还是 403
pub async fn find_submission(
    storage: &dyn Storage,
    homework: &Homework,
    submission_id: i64,
) -> ServiceResult<Option<Submission>> {
    Ok(storage
        .get_submission_by_id(submission_id)
        .await?
        .filter(|submission| submission.homework_id == homework.id))
}

pub async fn resolve_submission(
    storage: &dyn Storage,
    ids: &crate::utils::SafePathIds,
    user_id: i64,
) -> ServiceResult<SubmissionContext> {
    let HomeworkContext {
        access, homework, ..
    } = resolve_homework(
        storage,
        ids.course_id(),
        ids.lecture_id(),
        ids.homework_id(),
        user_id,
    )
    .await?;

    let submission = find_submission(storage, &homework, ids.submission_id())
        .await?
        .ok_or_else(|| {
            ServiceError::not_found(ErrorCode::SubmissionNotFound, "Submission does not exist")
        })?;

    Ok(SubmissionContext {
        access,
        homework,
        submission,
    })
}

pub async fn find_grade(
    storage: &dyn Storage,
    submission: &Submission,
    grade_id: i64,
) -> ServiceResult<Grade> {
    storage
        .get_grade_by_id(grade_id)
        .await?
        .filter(|grade| grade.submission_id == submission.id)
        .ok_or_else(|| ServiceError::not_found(ErrorCode::GradeNotFound, "Grade does not exist"))
}

/// 主负责人或课程教师
pub fn require_course_manager(access: &CourseAccess, user: &User) -> ServiceResult<()> {
    if access.can_manage(user.id) {
        Ok(())
    } else {
        Err(course_denied())
    }
}

pub fn require_primary_owner(access: &CourseAccess, user: &User) -> ServiceResult<()> {
    if access.is_primary_owner(user.id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            ErrorCode::CoursePermissionDenied,
            ONLY_PRIMARY_OWNER.to_string(),
        ))
    }
}

/// 作业的修改与删除：教师身份，且是创建者、主负责人或课程教师
pub fn require_homework_owner(
    access: &CourseAccess,
    homework: &Homework,
    user: &User,
) -> ServiceResult<()> {
    if !user.is_teacher() {
        return Err(ServiceError::forbidden(USER_MUST_BE_TEACHER));
    }
    if homework.created_by == user.id {
        return Ok(());
    }
    require_course_manager(access, user)
}

/// 提交者本人、作业创建者、主负责人或课程教师
pub fn require_submission_access(
    access: &CourseAccess,
    homework: &Homework,
    submission: &Submission,
    user: &User,
) -> ServiceResult<()> {
    if submission.student_id == user.id || homework.created_by == user.id {
        return Ok(());
    }
    require_course_manager(access, user)
}

/// 评分可见性：课程教师可见；学生须是提交者且仍在课程中
pub fn require_grade_viewer(
    access: &CourseAccess,
    submission: &Submission,
    user: &User,
) -> ServiceResult<()> {
    if access.can_manage(user.id) {
        return Ok(());
    }
    if submission.student_id == user.id && access.is_student {
        return Ok(());
    }
    Err(course_denied())
}

/// 评分的修改与删除：评分人、主负责人或课程教师
pub fn require_grader(access: &CourseAccess, grade: &Grade, user: &User) -> ServiceResult<()> {
    if grade.graded_by == user.id || access.can_manage(user.id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            ErrorCode::Forbidden,
            ONLY_GRADER.to_string(),
        ))
    }
}
