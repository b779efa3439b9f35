use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PaginationConfig;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub page_size: Option<i64>,
}

/// 归一化后的分页请求，交给存储层使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

impl PaginationQuery {
    /// page 最小为 1，page_size 被限制在 [1, max_page_size]
    pub fn resolve(&self, config: &PaginationConfig) -> PageRequest {
        let page = self.page.max(1) as u64;
        let page_size = match self.page_size {
            Some(size) => size.clamp(1, config.max_page_size as i64) as u64,
            None => config.default_page_size,
        };
        PageRequest::new(page, page_size)
    }
}

/// 存储层返回的一页数据
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }

    /// 保留分页信息，换成另一组已处理好的条目
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub page_size: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
    pub page_info: PageInfo,
}

impl<T: TS> PaginatedResponse<T> {
    /// `path` 与 `query_string` 来自当前请求，用于生成上一页/下一页链接
    pub fn from_page(page: Page<T>, path: &str, query_string: &str) -> Self {
        let next = (page.page < page.total_pages)
            .then(|| build_page_link(path, query_string, page.page + 1));
        let previous = (page.page > 1 && page.total_pages > 0)
            .then(|| build_page_link(path, query_string, page.page.min(page.total_pages + 1) - 1));

        Self {
            count: page.total as i64,
            next,
            previous,
            results: page.items,
            page_info: PageInfo {
                current_page: page.page as i64,
                total_pages: page.total_pages as i64,
                page_size: page.page_size as i64,
            },
        }
    }
}

/// 替换查询串中的 page 参数，第一页不带 page
pub fn build_page_link(path: &str, query_string: &str, page: u64) -> String {
    let mut params: Vec<&str> = query_string
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
        .collect();

    let page_param = format!("page={page}");
    if page > 1 {
        params.push(&page_param);
    }

    if params.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, params.join("&"))
    }
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn deserialize_optional_string_to_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_string_to_i64(deserializer).map(Some)
}

fn default_page() -> i64 {
    1
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: None,
        }
    }
}

/// 总页数，空结果视为 0 页
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_page_size: 10,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_resolve_defaults_and_clamp() {
        let query = PaginationQuery::default();
        assert_eq!(query.resolve(&config()), PageRequest::new(1, 10));

        let query = PaginationQuery {
            page: -3,
            page_size: Some(500),
        };
        assert_eq!(query.resolve(&config()), PageRequest::new(1, 100));

        let query = PaginationQuery {
            page: 2,
            page_size: Some(0),
        };
        assert_eq!(query.resolve(&config()), PageRequest::new(2, 1));
    }

    #[test]
    fn test_query_accepts_strings() {
        let query: PaginationQuery =
            serde_json::from_value(serde_json::json!({"page": "3", "page_size": "25"})).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.page_size, Some(25));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn test_page_links() {
        assert_eq!(
            build_page_link("/api/v1/courses", "page=2&search=rust", 3),
            "/api/v1/courses?search=rust&page=3"
        );
        assert_eq!(
            build_page_link("/api/v1/courses", "page=2&search=rust", 1),
            "/api/v1/courses?search=rust"
        );
        assert_eq!(build_page_link("/api/v1/courses", "", 1), "/api/v1/courses");
    }

    #[test]
    fn test_paginated_response_links() {
        let page = Page {
            items: vec![1, 2],
            total: 5,
            page: 2,
            page_size: 2,
            total_pages: 3,
        };
        let resp = PaginatedResponse::from_page(page, "/api/v1/users", "page=2&page_size=2");
        assert_eq!(resp.count, 5);
        assert_eq!(
            resp.next.as_deref(),
            Some("/api/v1/users?page_size=2&page=3")
        );
        assert_eq!(resp.previous.as_deref(), Some("/api/v1/users?page_size=2"));
        assert_eq!(resp.page_info.current_page, 2);

        let last = Page {
            items: Vec::<i32>::new(),
            total: 0,
            page: 1,
            page_size: 10,
            total_pages: 0,
        };
        let resp = PaginatedResponse::from_page(last, "/api/v1/users", "");
        assert!(resp.next.is_none());
        assert!(resp.previous.is_none());
    }
}
