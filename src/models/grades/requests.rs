use serde::Deserialize;
use ts_rs::TS;

// 创建评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct CreateGradeRequest {
    pub grade: Option<f64>,
    #[serde(default)]
    pub comments: String,
}

// 更新评分请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct UpdateGradeRequest {
    pub grade: Option<f64>,
    pub comments: Option<String>,
}
