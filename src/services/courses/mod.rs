pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::courses::entities::Course;
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::models::courses::responses::CourseListItem;
use crate::storage::Storage;

use super::{ServiceError, ServiceResult, impl_service_storage};

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl_service_storage!(CourseService);

impl CourseService {
    // 课程列表
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, request, query).await
    }

    // 课程详情
    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        get::get_course(self, request, course_id).await
    }

    // 创建课程，当前用户为主负责人
    pub async fn create_course(
        &self,
        request: &HttpRequest,
        body: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, body).await
    }

    // 更新课程
    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        body: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, request, course_id, body).await
    }

    // 删除课程
    pub async fn delete_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_course(self, request, course_id).await
    }
}

/// 批量补全主负责人和成员数量，保持输入顺序
pub(crate) async fn list_items(
    storage: &dyn Storage,
    courses: Vec<Course>,
) -> ServiceResult<Vec<CourseListItem>> {
    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
    let mut owner_ids: Vec<i64> = courses.iter().map(|c| c.primary_owner_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners: HashMap<i64, _> = storage
        .get_users_by_ids(&owner_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user.summary()))
        .collect();
    let counts = storage.count_course_members(&course_ids).await?;

    courses
        .into_iter()
        .map(|course| {
            let owner = owners.get(&course.primary_owner_id).cloned().ok_or_else(|| {
                ServiceError::Internal(format!(
                    "Primary owner {} of course {} is missing",
                    course.primary_owner_id, course.id
                ))
            })?;
            let (teachers, students) = counts.get(&course.id).copied().unwrap_or_default();
            Ok(CourseListItem::new(course, owner, teachers, students))
        })
        .collect()
}

pub(crate) async fn list_item(storage: &dyn Storage, course: Course) -> ServiceResult<CourseListItem> {
    let mut items = list_items(storage, vec![course]).await?;
    items
        .pop()
        .ok_or_else(|| ServiceError::Internal("Course list item was not built".to_string()))
}
