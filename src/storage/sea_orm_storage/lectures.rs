use super::SeaOrmStorage;
use crate::entity::lectures::{ActiveModel, Column, Entity as Lectures};
use crate::errors::{LmsError, Result};
use crate::models::{
    Page, PageRequest,
    lectures::{entities::Lecture, requests::UpdateLectureRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建课时
    pub async fn create_lecture_impl(&self, course_id: i64, topic: &str) -> Result<Lecture> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            topic: Set(topic.to_string()),
            presentation: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建课时失败: {e}")))?;

        Ok(result.into_lecture())
    }

    pub async fn get_lecture_by_id_impl(&self, lecture_id: i64) -> Result<Option<Lecture>> {
        let result = Lectures::find_by_id(lecture_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课时失败: {e}")))?;

        Ok(result.map(|m| m.into_lecture()))
    }

    /// 分页列出课程下的课时
    pub async fn list_lectures_with_pagination_impl(
        &self,
        course_id: i64,
        page: PageRequest,
    ) -> Result<Page<Lecture>> {
        let select = Lectures::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id);

        let lectures = self.fetch_page(select, page, "课时").await?;
        Ok(lectures.map(|m| m.into_lecture()))
    }

    pub async fn update_lecture_impl(
        &self,
        lecture_id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>> {
        let Some(existing) = Lectures::find_by_id(lecture_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课时失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(topic) = update.topic {
            model.topic = Set(topic);
        }

        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课时失败: {e}")))?;

        Ok(Some(result.into_lecture()))
    }

    /// 设置或清除课件路径
    pub async fn set_lecture_presentation_impl(
        &self,
        lecture_id: i64,
        presentation: Option<String>,
    ) -> Result<Option<Lecture>> {
        let Some(existing) = Lectures::find_by_id(lecture_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课时失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.presentation = Set(presentation);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课件失败: {e}")))?;

        Ok(Some(result.into_lecture()))
    }

    pub async fn delete_lecture_impl(&self, lecture_id: i64) -> Result<bool> {
        let result = Lectures::delete_by_id(lecture_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课时失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 同一课程下主题是否重复
    pub async fn lecture_topic_exists_impl(
        &self,
        course_id: i64,
        topic: &str,
        exclude_lecture_id: Option<i64>,
    ) -> Result<bool> {
        let mut select = Lectures::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Topic.eq(topic));

        if let Some(exclude) = exclude_lecture_id {
            select = select.filter(Column::Id.ne(exclude));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课时主题失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{storage, user};
    use crate::models::PageRequest;
    use crate::models::courses::requests::NewCourse;
    use crate::models::lectures::requests::UpdateLectureRequest;
    use crate::models::users::entities::UserRole;

    async fn course_id(storage: &super::SeaOrmStorage) -> i64 {
        let owner = user(storage, "owner@example.com", UserRole::Teacher).await;
        storage
            .create_course_impl(NewCourse {
                name: "Rust".into(),
                description: String::new(),
                primary_owner_id: owner.id,
                teacher_ids: vec![],
                student_ids: vec![],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_lecture_crud() {
        let storage = storage().await;
        let course_id = course_id(&storage).await;

        let lecture = storage
            .create_lecture_impl(course_id, "Ownership")
            .await
            .unwrap();
        assert_eq!(lecture.course_id, course_id);
        assert!(lecture.presentation.is_none());

        assert!(
            storage
                .lecture_topic_exists_impl(course_id, "Ownership", None)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .lecture_topic_exists_impl(course_id, "Ownership", Some(lecture.id))
                .await
                .unwrap()
        );

        let updated = storage
            .update_lecture_impl(
                lecture.id,
                UpdateLectureRequest {
                    topic: Some("Borrowing".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.topic, "Borrowing");

        let with_file = storage
            .set_lecture_presentation_impl(lecture.id, Some("presentations/a.pdf".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(with_file.presentation.as_deref(), Some("presentations/a.pdf"));

        assert!(storage.delete_lecture_impl(lecture.id).await.unwrap());
        assert!(
            storage
                .get_lecture_by_id_impl(lecture.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_lectures_by_course() {
        let storage = storage().await;
        let course_id = course_id(&storage).await;

        for topic in ["One", "Two", "Three"] {
            storage.create_lecture_impl(course_id, topic).await.unwrap();
        }

        let page = storage
            .list_lectures_with_pagination_impl(course_id, PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].topic, "One");

        let other = storage
            .list_lectures_with_pagination_impl(course_id + 1, PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(other.total, 0);
    }

    #[tokio::test]
    async fn test_deleting_course_removes_lectures() {
        let storage = storage().await;
        let course_id = course_id(&storage).await;
        let lecture = storage.create_lecture_impl(course_id, "One").await.unwrap();

        storage.delete_course_impl(course_id).await.unwrap();
        assert!(
            storage
                .get_lecture_by_id_impl(lecture.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
