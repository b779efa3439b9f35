use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub primary_owner_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 当前用户与某门课程的关系，供权限判断使用
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseAccess {
    pub course_id: i64,
    pub primary_owner_id: i64,
    pub is_teacher: bool,
    pub is_student: bool,
}

impl CourseAccess {
    pub fn is_primary_owner(&self, user_id: i64) -> bool {
        self.primary_owner_id == user_id
    }

    /// 主负责人或被指派的教师
    pub fn can_manage(&self, user_id: i64) -> bool {
        self.is_primary_owner(user_id) || self.is_teacher
    }
}
