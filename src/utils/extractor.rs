//! 路径参数提取器，非法 ID 直接返回 400 信封而不是 actix 默认的纯文本

use std::collections::HashMap;
use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

fn invalid_param(name: &str) -> actix_web::Error {
    let message = format!("Invalid path parameter: {name}");
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

/// 单个 `{id}` 路径参数
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req.match_info().get("id").and_then(parse_positive_id);
        ready(id.map(SafeIDI64).ok_or_else(|| invalid_param("id")))
    }
}

/// 嵌套资源路径中的全部 `*_id` 参数
///
/// `/api/v1/courses/{course_id}/lectures/{lecture_id}` 这类路由统一用它取 ID，
/// 路由中不存在的参数返回 0，查询时自然落到 404。
#[derive(Debug, Clone, Default)]
pub struct SafePathIds {
    ids: HashMap<String, i64>,
}

impl SafePathIds {
    pub fn get(&self, name: &str) -> i64 {
        self.ids.get(name).copied().unwrap_or_default()
    }

    pub fn course_id(&self) -> i64 {
        self.get("course_id")
    }

    pub fn lecture_id(&self) -> i64 {
        self.get("lecture_id")
    }

    pub fn homework_id(&self) -> i64 {
        self.get("homework_id")
    }

    pub fn submission_id(&self) -> i64 {
        self.get("submission_id")
    }

    pub fn grade_id(&self) -> i64 {
        self.get("grade_id")
    }

    /// 测试中直接用已知 ID 构造
    #[cfg(test)]
    pub(crate) fn from_ids<'a>(pairs: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self {
            ids: pairs
                .into_iter()
                .map(|(name, id)| (name.to_string(), id))
                .collect(),
        }
    }

    fn from_pairs<'a>(
        pairs: impl Iterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, actix_web::Error> {
        let mut ids = HashMap::new();
        for (name, value) in pairs.filter(|(name, _)| name.ends_with("_id")) {
            let id = parse_positive_id(value).ok_or_else(|| invalid_param(name))?;
            ids.insert(name.to_string(), id);
        }
        Ok(Self { ids })
    }
}

impl FromRequest for SafePathIds {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_pairs(req.match_info().iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("12"), Some(12));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("abc"), None);
    }

    #[test]
    fn test_path_ids_from_pairs() {
        let ids = SafePathIds::from_pairs(
            [("course_id", "3"), ("lecture_id", "7"), ("format", "x")].into_iter(),
        )
        .unwrap();
        assert_eq!(ids.course_id(), 3);
        assert_eq!(ids.lecture_id(), 7);
        assert_eq!(ids.homework_id(), 0);

        assert!(SafePathIds::from_pairs([("course_id", "abc")].into_iter()).is_err());
    }
}
