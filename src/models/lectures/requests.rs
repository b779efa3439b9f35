use serde::Deserialize;
use ts_rs::TS;

// 创建课时请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "lecture.ts")]
pub struct CreateLectureRequest {
    #[serde(default)]
    pub topic: String,
}

// 更新课时请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "lecture.ts")]
pub struct UpdateLectureRequest {
    pub topic: Option<String>,
}
