//! 课程创建与更新的校验流程
//!
//! 依次执行：基础字段、主负责人、教师名单、学生名单、业务规则。
//! 每一步的错误都会收集起来，全部放在 `non_field_errors` 下。

use crate::models::courses::entities::Course;
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::services::ServiceResult;
use crate::storage::Storage;

use super::users::validate_user_role;
use super::{ValidationErrors, is_blank};

pub const COURSE_CANT_BE_EMPTY: &str = "Course cannot be empty";
pub const PRIMARY_OWNER_ID_POSITIVE: &str = "Primary owner id must be positive";
pub const COURSE_ALREADY_EXISTS: &str = "A course with this name already exists for this teacher";
pub const PRIMARY_OWNER_IS_ALREADY_TEACHER: &str = "Primary owner is already teacher";

/// 待创建课程的字段
pub struct CourseDraft<'a> {
    pub name: &'a str,
    pub primary_owner_id: i64,
    pub teacher_ids: &'a [i64],
    pub student_ids: &'a [i64],
}

fn basic_fields(errors: &mut ValidationErrors, name: Option<&str>, owner_id: Option<i64>) {
    if name.is_some_and(is_blank) {
        errors.non_field(COURSE_CANT_BE_EMPTY);
    } else if owner_id.is_some_and(|id| id <= 0) {
        errors.non_field(PRIMARY_OWNER_ID_POSITIVE);
    }
}

async fn primary_owner(
    storage: &dyn Storage,
    errors: &mut ValidationErrors,
    owner_id: i64,
) -> ServiceResult<()> {
    if let Err(msg) = validate_user_role(storage, owner_id, UserRole::Teacher).await? {
        errors.non_field(format!("Primary owner: {msg}"));
    }
    Ok(())
}

async fn members(
    storage: &dyn Storage,
    errors: &mut ValidationErrors,
    user_ids: &[i64],
    role: UserRole,
) -> ServiceResult<()> {
    let label = match role {
        UserRole::Teacher => "Teacher",
        UserRole::Student => "Student",
    };
    for &user_id in user_ids {
        if let Err(msg) = validate_user_role(storage, user_id, role).await? {
            errors.non_field(format!("{label} {user_id}: {msg}"));
        }
    }
    Ok(())
}

pub async fn validate_course_creation(
    storage: &dyn Storage,
    draft: &CourseDraft<'_>,
) -> ServiceResult<ValidationErrors> {
    let mut errors = ValidationErrors::new();

    basic_fields(&mut errors, Some(draft.name), Some(draft.primary_owner_id));
    primary_owner(storage, &mut errors, draft.primary_owner_id).await?;
    members(storage, &mut errors, draft.teacher_ids, UserRole::Teacher).await?;
    members(storage, &mut errors, draft.student_ids, UserRole::Student).await?;

    // 业务规则：同名课程优先于负责人重复的检查
    if storage
        .course_name_exists(draft.name, draft.primary_owner_id, None)
        .await?
    {
        errors.non_field(COURSE_ALREADY_EXISTS);
    } else if draft.teacher_ids.contains(&draft.primary_owner_id) {
        errors.non_field(PRIMARY_OWNER_IS_ALREADY_TEACHER);
    }

    Ok(errors)
}

/// 只校验请求中出现的字段
pub async fn validate_course_update(
    storage: &dyn Storage,
    course: &Course,
    update: &UpdateCourseRequest,
) -> ServiceResult<ValidationErrors> {
    let mut errors = ValidationErrors::new();

    basic_fields(&mut errors, update.name.as_deref(), update.primary_owner_id);

    if let Some(owner_id) = update.primary_owner_id {
        primary_owner(storage, &mut errors, owner_id).await?;
    }
    if let Some(teacher_ids) = &update.teacher_ids {
        members(storage, &mut errors, teacher_ids, UserRole::Teacher).await?;
    }
    if let Some(student_ids) = &update.student_ids {
        members(storage, &mut errors, student_ids, UserRole::Student).await?;
    }

    if let Some(name) = &update.name {
        let owner_id = update.primary_owner_id.unwrap_or(course.primary_owner_id);
        if storage
            .course_name_exists(name, owner_id, Some(course.id))
            .await?
        {
            errors.non_field(COURSE_ALREADY_EXISTS);
            return Ok(errors);
        }
    }

    if let (Some(owner_id), Some(teacher_ids)) = (update.primary_owner_id, &update.teacher_ids)
        && teacher_ids.contains(&owner_id)
    {
        errors.non_field(PRIMARY_OWNER_IS_ALREADY_TEACHER);
    }

    Ok(errors)
}
