pub mod comments;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::models::grade_comments::requests::CreateGradeCommentRequest;
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
use crate::models::grades::responses::GradeResponse;
use crate::models::homeworks::entities::Homework;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::SafePathIds;

use super::access::{
    SubmissionContext, course_denied, find_submission, require_grade_viewer, resolve_homework,
};
use super::submissions::submission_response;
use super::{ServiceError, ServiceResult, impl_service_storage};

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl_service_storage!(GradeService);

impl GradeService {
    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, request, ids, query).await
    }

    pub async fn get_grade(&self, request: &HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
        get::get_grade(self, request, ids).await
    }

    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        body: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, request, ids, body).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        body: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, request, ids, body).await
    }

    pub async fn delete_grade(&self, request: &HttpRequest, ids: SafePathIds) -> ActixResult<HttpResponse> {
        delete::delete_grade(self, request, ids).await
    }

    // 评分讨论
    pub async fn list_comments(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        comments::list_comments(self, request, ids, query).await
    }

    pub async fn create_comment(
        &self,
        request: &HttpRequest,
        ids: SafePathIds,
        body: CreateGradeCommentRequest,
    ) -> ActixResult<HttpResponse> {
        comments::create_comment(self, request, ids, body).await
    }
}

/// 查看评分前的定位与权限检查
///
/// 提交不存在或不属于该作业时返回 403 而不是 404，不暴露提交是否存在。
pub(crate) async fn resolve_grade_viewer(
    storage: &dyn Storage,
    ids: &SafePathIds,
    user: &User,
) -> ServiceResult<SubmissionContext> {
    let ctx = resolve_homework(
        storage,
        ids.course_id(),
        ids.lecture_id(),
        ids.homework_id(),
        user.id,
    )
    .await?;

    let submission = find_submission(storage, &ctx.homework, ids.submission_id())
        .await?
        .ok_or_else(course_denied)?;
    require_grade_viewer(&ctx.access, &submission, user)?;

    Ok(SubmissionContext {
        access: ctx.access,
        homework: ctx.homework,
        submission,
    })
}

/// 评分响应内嵌提交与评分教师
pub(crate) async fn grade_responses(
    storage: &dyn Storage,
    homework: &Homework,
    submission: Submission,
    grades: Vec<Grade>,
) -> ServiceResult<Vec<GradeResponse>> {
    if grades.is_empty() {
        return Ok(Vec::new());
    }

    let mut grader_ids: Vec<i64> = grades.iter().map(|g| g.graded_by).collect();
    grader_ids.sort_unstable();
    grader_ids.dedup();
    let graders: HashMap<i64, _> = storage
        .get_users_by_ids(&grader_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user.summary()))
        .collect();

    let submission = submission_response(storage, homework, submission).await?;
    grades
        .into_iter()
        .map(|grade| {
            let grader = graders.get(&grade.graded_by).cloned().ok_or_else(|| {
                ServiceError::Internal(format!(
                    "Grader {} of grade {} is missing",
                    grade.graded_by, grade.id
                ))
            })?;
            Ok(GradeResponse::new(grade, submission.clone(), grader))
        })
        .collect()
}

pub(crate) async fn grade_response(
    storage: &dyn Storage,
    homework: &Homework,
    submission: Submission,
    grade: Grade,
) -> ServiceResult<GradeResponse> {
    grade_responses(storage, homework, submission, vec![grade])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::Internal("Grade response was not built".to_string()))
}
