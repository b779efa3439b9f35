use super::SeaOrmStorage;
use crate::entity::homeworks::{ActiveModel, Column, Entity as Homeworks};
use crate::errors::{LmsError, Result};
use crate::models::{
    Page, PageRequest,
    homeworks::{
        entities::Homework,
        requests::{NewHomework, UpdateHomeworkRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_homework_impl(&self, req: NewHomework) -> Result<Homework> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            lecture_id: Set(req.lecture_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            created_by: Set(req.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_homework())
    }

    pub async fn get_homework_by_id_impl(&self, homework_id: i64) -> Result<Option<Homework>> {
        let result = Homeworks::find_by_id(homework_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_homework()))
    }

    /// 分页列出课时下的作业，截止时间早的在前
    pub async fn list_homeworks_with_pagination_impl(
        &self,
        lecture_id: i64,
        page: PageRequest,
    ) -> Result<Page<Homework>> {
        let select = Homeworks::find()
            .filter(Column::LectureId.eq(lecture_id))
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id);

        let homeworks = self.fetch_page(select, page, "作业").await?;
        Ok(homeworks.map(|m| m.into_homework()))
    }

    pub async fn update_homework_impl(
        &self,
        homework_id: i64,
        update: UpdateHomeworkRequest,
    ) -> Result<Option<Homework>> {
        let Some(existing) = Homeworks::find_by_id(homework_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_homework()))
    }

    pub async fn delete_homework_impl(&self, homework_id: i64) -> Result<bool> {
        let result = Homeworks::delete_by_id(homework_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 同一课时下标题是否重复
    pub async fn homework_title_exists_impl(
        &self,
        lecture_id: i64,
        title: &str,
        exclude_homework_id: Option<i64>,
    ) -> Result<bool> {
        let mut select = Homeworks::find()
            .filter(Column::LectureId.eq(lecture_id))
            .filter(Column::Title.eq(title));

        if let Some(exclude) = exclude_homework_id {
            select = select.filter(Column::Id.ne(exclude));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业标题失败: {e}")))?;

        Ok(count > 0)
    }
}
