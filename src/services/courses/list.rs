use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, list_items};
use crate::models::courses::requests::CourseListParams;
use crate::services::{page_request, paginated_response, respond};

/// 任意登录用户可查看，新建的课程排在前面
pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseListParams,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let mut page = storage
                .list_courses_with_pagination(query.search, page_request(&query.pagination))
                .await?;
            let courses = std::mem::take(&mut page.items);
            let page = page.with_items(list_items(storage.as_ref(), courses).await?);

            Ok(paginated_response(request, page, "Course list retrieved successfully"))
        }
        .await,
    )
}

#[cfg(test)]
mod tests {
    use super::super::list_items;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage, user};

    #[tokio::test]
    async fn test_list_items_carry_owner_and_counts() {
        let storage = storage().await;
        let room = classroom(&storage, 2).await;
        let assistant = user(&storage, "a@example.com", UserRole::Teacher).await;
        storage
            .update_course(
                room.course.id,
                crate::models::courses::requests::UpdateCourseRequest {
                    teacher_ids: Some(vec![assistant.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let course = storage.get_course_by_id(room.course.id).await.unwrap().unwrap();
        let items = list_items(&storage, vec![course]).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].primary_owner.id, room.teacher.id);
        assert_eq!(items[0].teacher_count, 1);
        assert_eq!(items[0].student_count, 2);

        assert!(list_items(&storage, vec![]).await.unwrap().is_empty());
    }
}
