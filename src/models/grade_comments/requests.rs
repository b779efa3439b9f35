use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade_comment.ts")]
pub struct CreateGradeCommentRequest {
    #[serde(default)]
    pub comment: String,
}
