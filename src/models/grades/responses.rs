use serde::Serialize;
use ts_rs::TS;

use super::entities::Grade;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::users::entities::UserSummary;

// 评分响应，内嵌提交与评分教师
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct GradeResponse {
    pub id: i64,
    pub submission: SubmissionResponse,
    pub grade: Option<f64>,
    pub comments: String,
    pub graded_by: UserSummary,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl GradeResponse {
    pub fn new(grade: Grade, submission: SubmissionResponse, graded_by: UserSummary) -> Self {
        Self {
            id: grade.id,
            submission,
            grade: grade.grade,
            comments: grade.comments,
            graded_by,
            graded_at: grade.graded_at,
            updated_at: grade.updated_at,
        }
    }
}
