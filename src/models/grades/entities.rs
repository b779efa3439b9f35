use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评分实体，grade 保留两位小数
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub grade: Option<f64>,
    pub comments: String,
    pub graded_by: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;

/// 按两位小数四舍五入
pub fn round_grade(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
