//! 评分存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{LmsError, Result};
use crate::models::{
    Page, PageRequest,
    grades::{
        entities::{Grade, round_grade},
        requests::UpdateGradeRequest,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建评分
    pub async fn create_grade_impl(
        &self,
        submission_id: i64,
        grade: Option<f64>,
        comments: &str,
        graded_by: i64,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            submission_id: Set(submission_id),
            grade: Set(grade.map(round_grade)),
            comments: Set(comments.to_string()),
            graded_by: Set(graded_by),
            graded_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建评分失败: {e}")))?;

        Ok(result.into_grade())
    }

    /// 通过 ID 获取评分
    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 通过提交 ID 获取评分
    pub async fn get_grade_by_submission_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 列出提交下的评分（至多一条）
    pub async fn list_grades_with_pagination_impl(
        &self,
        submission_id: i64,
        page: PageRequest,
    ) -> Result<Page<Grade>> {
        let select = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::Id);

        let grades = self.fetch_page(select, page, "评分").await?;
        Ok(grades.map(|m| m.into_grade()))
    }

    /// 更新评分
    pub async fn update_grade_impl(
        &self,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        let Some(existing) = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(grade) = update.grade {
            model.grade = Set(Some(round_grade(grade)));
        }

        if let Some(comments) = update.comments {
            model.comments = Set(comments);
        }

        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新评分失败: {e}")))?;

        Ok(Some(result.into_grade()))
    }

    pub async fn delete_grade_impl(&self, grade_id: i64) -> Result<bool> {
        let result = Grades::delete_by_id(grade_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除评分失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{classroom, storage};
    use crate::models::PageRequest;
    use crate::models::grades::requests::UpdateGradeRequest;

    #[tokio::test]
    async fn test_grade_is_rounded_and_unique() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let submission = storage
            .create_submission_impl(room.homework.id, room.students[0].id, "answer")
            .await
            .unwrap();

        let grade = storage
            .create_grade_impl(submission.id, Some(87.456), "good", room.teacher.id)
            .await
            .unwrap();
        assert_eq!(grade.grade, Some(87.46));
        assert_eq!(grade.graded_by, room.teacher.id);

        // 每个提交只能有一条评分
        assert!(
            storage
                .create_grade_impl(submission.id, Some(50.0), "", room.teacher.id)
                .await
                .is_err()
        );

        let by_submission = storage
            .get_grade_by_submission_id_impl(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_submission.id, grade.id);

        let page = storage
            .list_grades_with_pagination_impl(submission.id, PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_grade() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let submission = storage
            .create_submission_impl(room.homework.id, room.students[0].id, "answer")
            .await
            .unwrap();
        let grade = storage
            .create_grade_impl(submission.id, None, "", room.teacher.id)
            .await
            .unwrap();
        assert!(grade.grade.is_none());

        let updated = storage
            .update_grade_impl(
                grade.id,
                UpdateGradeRequest {
                    grade: Some(99.999),
                    comments: Some("great".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.grade, Some(100.0));
        assert_eq!(updated.comments, "great");

        assert!(storage.delete_grade_impl(grade.id).await.unwrap());
        assert!(storage.get_grade_by_id_impl(grade.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_submission_removes_grade() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        let submission = storage
            .create_submission_impl(room.homework.id, room.students[0].id, "answer")
            .await
            .unwrap();
        let grade = storage
            .create_grade_impl(submission.id, Some(70.0), "", room.teacher.id)
            .await
            .unwrap();

        storage.delete_submission_impl(submission.id).await.unwrap();
        assert!(storage.get_grade_by_id_impl(grade.id).await.unwrap().is_none());
    }
}
