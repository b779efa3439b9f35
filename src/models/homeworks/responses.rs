use serde::Serialize;
use ts_rs::TS;

use super::entities::Homework;
use crate::models::lectures::entities::Lecture;
use crate::models::users::entities::UserSummary;

// 作业响应，内嵌所属课时与创建者
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct HomeworkResponse {
    pub id: i64,
    pub lecture: Lecture,
    pub title: String,
    pub description: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub created_by: UserSummary,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl HomeworkResponse {
    pub fn new(homework: Homework, lecture: Lecture, created_by: UserSummary) -> Self {
        Self {
            id: homework.id,
            lecture,
            title: homework.title,
            description: homework.description,
            due_date: homework.due_date,
            created_by,
            created_at: homework.created_at,
            updated_at: homework.updated_at,
        }
    }
}
