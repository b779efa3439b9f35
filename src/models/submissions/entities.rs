use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业提交实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: i64,
    pub homework_id: i64,
    pub student_id: i64,
    pub content: String,
    pub is_submitted: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
