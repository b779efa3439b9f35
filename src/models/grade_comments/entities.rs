use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserSummary;

// 评分讨论，内嵌作者信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade_comment.ts")]
pub struct GradeComment {
    pub id: i64,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub grade_id: i64,
    pub author: UserSummary,
    pub comment: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
