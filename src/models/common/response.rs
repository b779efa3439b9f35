use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 字段级校验错误：字段名 -> 错误信息列表
///
/// 不属于具体字段的错误放在 `non_field_errors` 下。
pub type FieldErrors = std::collections::BTreeMap<String, Vec<String>>;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_serialization() {
        let mut errors = FieldErrors::new();
        errors.insert("name".into(), vec!["Course cannot be empty".into()]);
        let resp = ApiResponse::error(ErrorCode::ValidationFailed, errors, "Course cannot be empty");
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["code"], 1006);
        assert_eq!(json["data"]["name"][0], "Course cannot be empty");
    }

    #[test]
    fn test_empty_response_skips_data() {
        let resp = ApiResponse::success_empty("ok");
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["code"], 0);
    }
}
