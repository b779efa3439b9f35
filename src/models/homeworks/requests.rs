use serde::Deserialize;
use ts_rs::TS;

// 创建作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct CreateHomeworkRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
}

// 更新作业请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct UpdateHomeworkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// 存储层创建作业
#[derive(Debug, Clone)]
pub struct NewHomework {
    pub lecture_id: i64,
    pub title: String,
    pub description: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub created_by: i64,
}
