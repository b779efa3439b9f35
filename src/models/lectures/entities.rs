use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课时实体，presentation 为课件在上传目录下的相对路径
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lecture.ts")]
pub struct Lecture {
    pub id: i64,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub course_id: i64,
    pub topic: String,
    pub presentation: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
