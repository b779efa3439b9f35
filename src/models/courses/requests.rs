use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

// 课程列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建课程请求，主负责人为当前登录用户
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateCourseRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub teacher_ids: Vec<i64>,
    #[serde(default)]
    pub student_ids: Vec<i64>,
}

// 更新课程请求，仅处理提供的字段
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub primary_owner_id: Option<i64>,
    pub teacher_ids: Option<Vec<i64>>,
    pub student_ids: Option<Vec<i64>>,
}

/// 存储层创建课程
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub primary_owner_id: i64,
    pub teacher_ids: Vec<i64>,
    pub student_ids: Vec<i64>,
}
