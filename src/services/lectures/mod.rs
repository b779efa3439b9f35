pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod presentation;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::models::lectures::requests::{CreateLectureRequest, UpdateLectureRequest};
use crate::storage::Storage;

use super::impl_service_storage;

pub struct LectureService {
    storage: Option<Arc<dyn Storage>>,
}

impl_service_storage!(LectureService);

impl LectureService {
    pub async fn list_lectures(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_lectures(self, request, course_id, query).await
    }

    pub async fn get_lecture(
        &self,
        request: &HttpRequest,
        course_id: i64,
        lecture_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_lecture(self, request, course_id, lecture_id).await
    }

    pub async fn create_lecture(
        &self,
        request: &HttpRequest,
        course_id: i64,
        body: CreateLectureRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_lecture(self, request, course_id, body).await
    }

    pub async fn update_lecture(
        &self,
        request: &HttpRequest,
        course_id: i64,
        lecture_id: i64,
        body: UpdateLectureRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_lecture(self, request, course_id, lecture_id, body).await
    }

    // 删除课时，同时删除课件文件
    pub async fn delete_lecture(
        &self,
        request: &HttpRequest,
        course_id: i64,
        lecture_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_lecture(self, request, course_id, lecture_id).await
    }

    // 上传课件，替换旧文件
    pub async fn upload_presentation(
        &self,
        request: &HttpRequest,
        course_id: i64,
        lecture_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        presentation::upload_presentation(self, request, course_id, lecture_id, payload).await
    }
}
