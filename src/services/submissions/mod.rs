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
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::{CreateSubmissionRequest, UpdateSubmissionRequest};
use crate::models::submissions::responses::{HomeworkBrief, SubmissionResponse};
use crate::storage::Storage;
use crate::utils::SafePathIds;

use super::{ServiceError, ServiceResult, impl_service_storage};

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl_service_storage!(SubmissionService);

impl SubmissionService {
    // 学生只能看到自己的提交
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, ids, query).await
    }

    pub async fn get_submission(&self, request: &HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
        get::get_submission(self, request, ids).await
    }

    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        body: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, ids, body).await
    }

    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        body: UpdateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, ids, body).await
    }

    pub async fn delete_submission(&self, request: &HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
        delete::delete_submission(self, request, ids).await
    }
}

pub(crate) fn homework_brief(homework: &Homework) -> HomeworkBrief {
    HomeworkBrief {
        id: homework.id,
        title: homework.title.clone(),
        due_date: homework.due_date,
    }
}

/// 批量补全提交者信息
pub(crate) async fn submission_responses(
    storage: &dyn Storage,
    homework: &Homework,
    submissions: Vec<Submission>,
) -> ServiceResult<Vec<SubmissionResponse>> {
    let mut student_ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
    student_ids.sort_unstable();
    student_ids.dedup();

    let students: HashMap<i64, _> = storage
        .get_users_by_ids(&student_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user.summary()))
        .collect();

    submissions
        .into_iter()
        .map(|submission| {
            let student = students.get(&submission.student_id).cloned().ok_or_else(|| {
                ServiceError::Internal(format!(
                    "Student {} of submission {} is missing",
                    submission.student_id, submission.id
                ))
            })?;
            Ok(SubmissionResponse::new(submission, homework_brief(homework), student))
        })
        .collect()
}

pub(crate) async fn submission_response(
    storage: &dyn Storage,
    homework: &Homework,
    submission: Submission,
) -> ServiceResult<SubmissionResponse> {
    submission_responses(storage, homework, vec![submission])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::Internal("Submission response was not built".to_string()))
}
