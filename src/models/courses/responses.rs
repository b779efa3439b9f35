use serde::Serialize;
use ts_rs::TS;

use super::entities::Course;
use crate::models::users::entities::UserSummary;

// 课程列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseListItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub primary_owner: UserSummary,
    pub teacher_count: i64,
    pub student_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseListItem {
    pub fn new(
        course: Course,
        primary_owner: UserSummary,
        teacher_count: i64,
        student_count: i64,
    ) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            primary_owner,
            teacher_count,
            student_count,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

// 课程详情，附带教师和学生名单
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub course: CourseListItem,
    pub teachers: Vec<UserSummary>,
    pub students: Vec<UserSummary>,
}
