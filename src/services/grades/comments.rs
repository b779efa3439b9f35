//! 评分下的讨论，课程教师和提交者本人可参与

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, resolve_grade_viewer};
use crate::models::grade_comments::entities::GradeComment;
use crate::models::grade_comments::requests::CreateGradeCommentRequest;
use crate::models::grades::entities::Grade;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, Page, PageRequest, PaginationQuery};
use crate::services::access::find_grade;
use crate::services::validation::grades::validate_comment;
use crate::services::{ServiceResult, current_user, page_request, paginated_response, respond};
use crate::storage::Storage;
use crate::utils::SafePathIds;

pub async fn list_comments(
    service: &GradeService,
    request: &HttpRequest,
    ids: SafePathIds,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let page = list(storage.as_ref(), &user, &ids, page_request(&query)).await?;
            Ok(paginated_response(request, page, "Comment list retrieved successfully"))
        }
        .await,
    )
}

pub async fn create_comment(
    service: &GradeService,
    request: &HttpRequest,
    ids: SafePathIds,
    body: CreateGradeCommentRequest,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let comment = create(storage.as_ref(), &user, &ids, body).await?;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                comment,
                "Comment created successfully",
            )))
        }
        .await,
    )
}

async fn resolve_discussion(
    storage: &dyn Storage,
    ids: &SafePathIds,
    user: &User,
) -> ServiceResult<Grade> {
    // 先做可见性检查，无权用户无法探测评分是否存在
    let ctx = resolve_grade_viewer(storage, ids, user).await?;
    find_grade(storage, &ctx.submission, ids.grade_id()).await
}

/// 按创建时间正序
pub(crate) async fn list(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    page: PageRequest,
) -> ServiceResult<Page<GradeComment>> {
    let grade = resolve_discussion(storage, ids, user).await?;
    Ok(storage
        .list_grade_comments_with_pagination(grade.id, page)
        .await?)
}

pub(crate) async fn create(
    storage: &dyn Storage,
    user: &User,
    ids: &SafePathIds,
    body: CreateGradeCommentRequest,
) -> ServiceResult<GradeComment> {
    let grade = resolve_discussion(storage, ids, user).await?;
    let comment = body.comment.trim();
    validate_comment(comment).into_result()?;

    Ok(storage.create_grade_comment(grade.id, user.id, comment).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::services::ServiceError;
    use crate::services::grades::test_paths::submission_path;
    use crate::services::validation::grades::COMMENT_CANT_BE_EMPTY;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    fn body(comment: &str) -> CreateGradeCommentRequest {
        CreateGradeCommentRequest {
            comment: comment.into(),
        }
    }

    #[tokio::test]
    async fn test_discussion_between_teacher_and_student() {
        let storage = storage().await;
        let room = classroom(&storage, 2).await;
        let owner = &room.students[0];
        let submission = storage
            .create_submission(room.homework.id, owner.id, "answer")
            .await
            .unwrap();
        let grade = storage
            .create_grade(submission.id, Some(60.0), "", room.teacher.id)
            .await
            .unwrap();
        let path = submission_path(&room, submission.id, Some(grade.id));

        create(&storage, owner, &path, body("Why 60?")).await.unwrap();
        let reply = create(&storage, &room.teacher, &path, body(" See rubric "))
            .await
            .unwrap();
        assert_eq!(reply.comment, "See rubric");
        assert_eq!(reply.author.id, room.teacher.id);

        let page = list(&storage, owner, &path, PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].comment, "Why 60?");
        assert_eq!(page.items[0].author.id, owner.id);

        match create(&storage, owner, &path, body("   ")).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.field("comment"), [COMMENT_CANT_BE_EMPTY])
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            list(&storage, &room.students[1], &path, PageRequest::new(1, 10)).await,
            Err(ServiceError::Forbidden(ErrorCode::CoursePermissionDenied, _))
        ));
    }

    #[tokio::test]
    async fn test_outsider_cannot_discover_grade_ids() {
        let storage = storage().await;
        let room = classroom(&storage, 2).await;
        let owner = &room.students[0];
        let submission = storage
            .create_submission(room.homework.id, owner.id, "answer")
            .await
            .unwrap();
        let grade = storage
            .create_grade(submission.id, Some(75.0), "", room.teacher.id)
            .await
            .unwrap();

        // 存在与不存在的评分对无权用户给出同样的 403
        for grade_id in [grade.id, grade.id + 100] {
            let path = submission_path(&room, submission.id, Some(grade_id));
            assert!(matches!(
                list(&storage, &room.students[1], &path, PageRequest::new(1, 10)).await,
                Err(ServiceError::Forbidden(ErrorCode::CoursePermissionDenied, _))
            ));
        }

        // 有权用户仍然看到 404
        let path = submission_path(&room, submission.id, Some(grade.id + 100));
        assert!(matches!(
            list(&storage, owner, &path, PageRequest::new(1, 10)).await,
            Err(ServiceError::NotFound(ErrorCode::GradeNotFound, _))
        ));
    }
}
