use serde::Deserialize;
use ts_rs::TS;

// 提交作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct CreateSubmissionRequest {
    #[serde(default)]
    pub content: String,
}

// 更新提交请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct UpdateSubmissionRequest {
    pub content: Option<String>,
    pub is_submitted: Option<bool>,
}
