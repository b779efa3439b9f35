//! 作业提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::{
    Page, PageRequest,
    submissions::{entities::Submission, requests::UpdateSubmissionRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(
        &self,
        homework_id: i64,
        student_id: i64,
        content: &str,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            homework_id: Set(homework_id),
            student_id: Set(student_id),
            content: Set(content.to_string()),
            is_submitted: Set(true),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出作业的提交，最新的在前
    pub async fn list_submissions_with_pagination_impl(
        &self,
        homework_id: i64,
        student_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Page<Submission>> {
        let mut select = Submissions::find().filter(Column::HomeworkId.eq(homework_id));

        if let Some(student_id) = student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        select = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        let submissions = self.fetch_page(select, page, "提交").await?;
        Ok(submissions.map(|m| m.into_submission()))
    }

    pub async fn update_submission_impl(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(content) = update.content {
            model.content = Set(content);
        }

        if let Some(is_submitted) = update.is_submitted {
            model.is_submitted = Set(is_submitted);
        }

        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新提交失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    pub async fn delete_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(submission_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除提交失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生是否已提交过该作业
    pub async fn submission_exists_impl(&self, homework_id: i64, student_id: i64) -> Result<bool> {
        let count = Submissions::find()
            .filter(Column::HomeworkId.eq(homework_id))
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{classroom, storage};
    use crate::models::PageRequest;
    use crate::models::submissions::requests::UpdateSubmissionRequest;

    #[tokio::test]
    async fn test_one_submission_per_student() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let student = &room.students[0];

        let submission = storage
            .create_submission_impl(room.homework.id, student.id, "answer")
            .await
            .unwrap();
        assert!(submission.is_submitted);

        assert!(
            storage
                .submission_exists_impl(room.homework.id, student.id)
                .await
                .unwrap()
        );
        assert!(
            storage
                .create_submission_impl(room.homework.id, student.id, "again")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_student() {
        let storage = storage().await;
        let room = classroom(&storage, 2).await;

        for student in &room.students {
            storage
                .create_submission_impl(room.homework.id, student.id, "answer")
                .await
                .unwrap();
        }

        let all = storage
            .list_submissions_with_pagination_impl(room.homework.id, None, PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let own = storage
            .list_submissions_with_pagination_impl(
                room.homework.id,
                Some(room.students[1].id),
                PageRequest::new(1, 10),
            )
            .await
            .unwrap();
        assert_eq!(own.total, 1);
        assert_eq!(own.items[0].student_id, room.students[1].id);
    }

    #[tokio::test]
    async fn test_update_and_delete_submission() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let submission = storage
            .create_submission_impl(room.homework.id, room.students[0].id, "draft")
            .await
            .unwrap();

        let updated = storage
            .update_submission_impl(
                submission.id,
                UpdateSubmissionRequest {
                    content: None,
                    is_submitted: Some(false),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "draft");
        assert!(!updated.is_submitted);

        assert!(storage.delete_submission_impl(submission.id).await.unwrap());
        assert!(
            !storage
                .submission_exists_impl(room.homework.id, room.students[0].id)
                .await
                .unwrap()
        );
    }
}
