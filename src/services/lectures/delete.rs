use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::LectureService;
use super::presentation::remove_presentation;
use crate::config::AppConfig;
use crate::models::users::entities::User;
use crate::services::access::{require_course_manager, resolve_lecture};
use crate::services::{ServiceResult, current_user, respond};
use crate::storage::Storage;

pub async fn delete_lecture(
    service: &LectureService,
    request: &HttpRequest,
    course_id: i64,
    lecture_id: i64,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            if let Some(presentation) = delete(storage.as_ref(), &user, course_id, lecture_id).await? {
                remove_presentation(&AppConfig::get().upload.dir, &presentation);
            }
            Ok(HttpResponse::NoContent().finish())
        }
        .await,
    )
}

/// 删除成功后返回需要清理的课件路径
pub(crate) async fn delete(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    lecture_id: i64,
) -> ServiceResult<Option<String>> {
    let ctx = resolve_lecture(storage, course_id, lecture_id, user.id).await?;
    require_course_manager(&ctx.access, user)?;

    storage.delete_lecture(lecture_id).await?;
    info!("Lecture {} deleted by user {}", lecture_id, user.id);
    Ok(ctx.lecture.presentation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    #[tokio::test]
    async fn test_delete_lecture() {
        let storage = storage().await;
        let room = classroom(&storage, 1).await;
        storage
            .set_lecture_presentation(room.lecture.id, Some("presentations/a.pdf".into()))
            .await
            .unwrap();

        assert!(matches!(
            delete(&storage, &room.students[0], room.course.id, room.lecture.id).await,
            Err(ServiceError::Forbidden(..))
        ));

        let removed = delete(&storage, &room.teacher, room.course.id, room.lecture.id)
            .await
            .unwrap();
        assert_eq!(removed.as_deref(), Some("presentations/a.pdf"));
        assert!(storage.get_homework_by_id(room.homework.id).await.unwrap().is_none());
    }
}
