pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::models::homeworks::entities::Homework;
use crate::models::homeworks::requests::{CreateHomeworkRequest, UpdateHomeworkRequest};
use crate::models::homeworks::responses::HomeworkResponse;
use crate::models::lectures::entities::Lecture;
use crate::storage::Storage;
use crate::utils::SafePathIds;

use super::{ServiceError, ServiceResult, impl_service_storage};

pub struct HomeworkService {
    storage: Option<Arc<dyn Storage>>,
}

impl_service_storage!(HomeworkService);

impl HomeworkService {
    // 课时下的作业列表，按截止时间排序
    pub async fn list_homeworks(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_homeworks(self, request, ids, query).await
    }

    pub async fn get_homework(&self, request: &HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
        get::get_homework(self, request, ids).await
    }

    pub async fn create_homework(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        body: CreateHomeworkRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_homework(self, request, ids, body).await
    }

    pub async fn update_homework(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        body: UpdateHomeworkRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_homework(self, request, ids, body).await
    }

    pub async fn delete_homework(&self, request: &HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
        delete::delete_homework(self, request, ids).await
    }
}

/// 作业响应内嵌课时与创建者，创建者批量查询
pub(crate) async fn homework_responses(
    storage: &dyn Storage,
    lecture: &Lecture,
    homeworks: Vec<Homework>,
) -> ServiceResult<Vec<HomeworkResponse>> {
    let mut creator_ids: Vec<i64> = homeworks.iter().map(|h| h.created_by).collect();
    creator_ids.sort_unstable();
    creator_ids.dedup();

    let creators: HashMap<i64, _> = storage
        .get_users_by_ids(&creator_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user.summary()))
        .collect();

    homeworks
        .into_iter()
        .map(|homework| {
            let creator = creators.get(&homework.created_by).cloned().ok_or_else(|| {
                ServiceError::Internal(format!(
                    "Creator {} of homework {} is missing",
                    homework.created_by, homework.id
                ))
            })?;
            Ok(HomeworkResponse::new(homework, lecture.clone(), creator))
        })
        .collect()
}

pub(crate) async fn homework_response(
    storage: &dyn Storage,
    lecture: &Lecture,
    homework: Homework,
) -> ServiceResult<HomeworkResponse> {
    homework_responses(storage, lecture, vec![homework])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::Internal("Homework response was not built".to_string()))
}
