//! 评分讨论存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::grade_comments::{ActiveModel, Column, Entity as GradeComments, Model};
use crate::errors::{LmsError, Result};
use crate::models::{
    Page, PageRequest, grade_comments::entities::GradeComment, users::entities::UserSummary,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn to_comment(model: Model, author: UserSummary) -> GradeComment {
    GradeComment {
        id: model.id,
        grade_id: model.grade_id,
        author,
        comment: model.comment,
        created_at: DateTime::<Utc>::from_timestamp(model.created_at, 0).unwrap_or_default(),
        updated_at: DateTime::<Utc>::from_timestamp(model.updated_at, 0).unwrap_or_default(),
    }
}

impl SeaOrmStorage {
    /// 发表评论
    pub async fn create_grade_comment_impl(
        &self,
        grade_id: i64,
        author_id: i64,
        comment: &str,
    ) -> Result<GradeComment> {
        let author = self
            .get_user_by_id_impl(author_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("用户 {author_id} 不存在")))?;

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            grade_id: Set(grade_id),
            author_id: Set(author_id),
            comment: Set(comment.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建评论失败: {e}")))?;

        Ok(to_comment(result, author.summary()))
    }

    /// 分页列出评论，按时间正序
    pub async fn list_grade_comments_with_pagination_impl(
        &self,
        grade_id: i64,
        page: PageRequest,
    ) -> Result<Page<GradeComment>> {
        let select = GradeComments::find()
            .filter(Column::GradeId.eq(grade_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id);

        let models = self.fetch_page(select, page, "评论").await?;

        let mut author_ids: Vec<i64> = models.items.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<i64, UserSummary> = self
            .get_users_by_ids_impl(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        let Page {
            items,
            total,
            page,
            page_size,
            total_pages,
        } = models;

        let mut comments = Vec::with_capacity(items.len());
        for model in items {
            let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
                LmsError::database_operation(format!("评论作者 {} 不存在", model.author_id))
            })?;
            comments.push(to_comment(model, author));
        }

        Ok(Page {
            items: comments,
            total,
            page,
            page_size,
            total_pages,
        })
    }
}
