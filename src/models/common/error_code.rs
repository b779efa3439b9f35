use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码，写入 `ApiResponse.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ValidationFailed = 1006,

    // 认证 2xxx
    AuthFailed = 2000,
    RegisterFailed = 2001,
    TokenBlacklisted = 2002,
    TokenInvalid = 2003,
    AccountDisabled = 2004,

    // 用户 3xxx
    UserNotFound = 3000,
    UserEmailAlreadyExists = 3001,

    // 课程 4xxx
    CourseNotFound = 4000,
    CoursePermissionDenied = 4001,
    CourseAlreadyExists = 4002,

    // 课时与课件 5xxx
    LectureNotFound = 5000,
    FileUploadFailed = 5100,
    FileTypeNotAllowed = 5101,
    FileSizeExceeded = 5102,
    MultifileUploadNotAllowed = 5103,

    // 作业 6xxx
    HomeworkNotFound = 6000,

    // 提交 7xxx
    SubmissionNotFound = 7000,

    // 评分 8xxx
    GradeNotFound = 8000,
}
