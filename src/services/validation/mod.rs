//! 业务校验
//!
//! 每个校验流程都会把所有错误收集完再返回，而不是遇到第一个错误就停下。
//! 字段相关的错误挂在字段名下，其余放进 `non_field_errors`。

pub mod courses;
pub mod grades;
pub mod homeworks;
pub mod lectures;
pub mod submissions;
pub mod users;

use crate::models::{FieldErrors, NON_FIELD_ERRORS};

use super::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: FieldErrors,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只含一条错误
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// 用作响应 message：优先取 `non_field_errors`
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .get(NON_FIELD_ERRORS)
            .and_then(|messages| messages.first())
            .or_else(|| self.errors.values().flatten().next())
            .map(String::as_str)
    }

    pub fn into_field_errors(self) -> FieldErrors {
        self.errors
    }

    /// 没有错误时返回 Ok
    pub fn into_result(self) -> ServiceResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

/// 去掉首尾空白后是否为空
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
