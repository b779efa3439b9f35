use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;
use crate::models::users::entities::UserSummary;

// 提交中内嵌的作业简要信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct HomeworkBrief {
    pub id: i64,
    pub title: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionResponse {
    pub id: i64,
    pub homework: HomeworkBrief,
    pub student: UserSummary,
    pub content: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub is_submitted: bool,
}

impl SubmissionResponse {
    pub fn new(submission: Submission, homework: HomeworkBrief, student: UserSummary) -> Self {
        Self {
            id: submission.id,
            homework,
            student,
            content: submission.content,
            submitted_at: submission.submitted_at,
            updated_at: submission.updated_at,
            is_submitted: submission.is_submitted,
        }
    }
}
