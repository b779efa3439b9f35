pub mod error_code;
pub mod pagination;
pub mod response;

pub use error_code::ErrorCode;
pub use pagination::{Page, PageInfo, PageRequest, PaginatedResponse, PaginationQuery};
pub use response::{ApiResponse, FieldErrors, NON_FIELD_ERRORS};
