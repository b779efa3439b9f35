pub mod auth;
pub mod common;
pub mod courses;
pub mod grade_comments;
pub mod grades;
pub mod homeworks;
pub mod lectures;
pub mod submissions;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, FieldErrors, NON_FIELD_ERRORS, Page, PageInfo, PageRequest,
    PaginatedResponse, PaginationQuery,
};

// 程序启动时间，用于统计启动耗时
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
