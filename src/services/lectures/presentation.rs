//! 课件上传
//!
//! 文件先写入 `upload.dir/presentations/`，边写边校验扩展名、魔术字节和大小，
//! 任一检查失败时删除已写入的部分。数据库更新成功后才删除旧课件。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use super::LectureService;
use crate::config::{AppConfig, UploadConfig};
use crate::errors::LmsError;
use crate::models::lectures::entities::Lecture;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{require_course_manager, resolve_lecture};
use crate::services::{ServiceError, ServiceResult, current_user, respond};
use crate::storage::Storage;
use crate::utils::file_magic::extension_of;
use crate::utils::validate_magic_bytes;

pub const PRESENTATION_DIR: &str = "presentations";
pub const NO_FILE_SUBMITTED: &str = "No file was submitted.";
pub const EMPTY_FILE: &str = "The submitted file is empty.";

pub async fn upload_presentation(
    service: &LectureService,
    request: &HttpRequest,
    course_id: i64,
    lecture_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    respond(
        async {
            let storage = service.get_storage(request)?;
            let user = current_user(request)?;
            let ctx = resolve_lecture(storage.as_ref(), course_id, lecture_id, user.id).await?;
            require_course_manager(&ctx.access, &user)?;

            let config = &AppConfig::get().upload;
            let relative = read_presentation(config, payload).await?;
            let lecture = attach(storage.as_ref(), &config.dir, ctx.lecture, relative).await?;
            info!("Presentation of lecture {} uploaded by user {}", lecture.id, user.id);

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                lecture,
                "Presentation uploaded successfully",
            )))
        }
        .await,
    )
}

fn upload_failed(err: impl std::fmt::Display) -> ServiceError {
    ServiceError::BadRequest(ErrorCode::FileUploadFailed, format!("File upload failed: {err}"))
}

/// 只接受名为 `file` 的单个字段，其余字段忽略
async fn read_presentation(config: &UploadConfig, mut payload: Multipart) -> ServiceResult<String> {
    let mut pending: Option<PendingPresentation> = None;

    while let Some(mut field) = payload.try_next().await.map_err(upload_failed)? {
        let disposition = field.content_disposition();
        if disposition.and_then(|cd| cd.get_name()) != Some("file") {
            continue;
        }
        let file_name = disposition
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();

        if pending.is_some() {
            return Err(ServiceError::BadRequest(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time".to_string(),
            ));
        }

        let mut file = PendingPresentation::create(config, &file_name)?;
        while let Some(chunk) = field.try_next().await.map_err(upload_failed)? {
            file.write_chunk(&chunk)?;
        }
        pending = Some(file);
    }

    pending
        .ok_or_else(|| ServiceError::field("file", NO_FILE_SUBMITTED))?
        .commit()
}

/// 正在写入的课件，提交前被丢弃时删除磁盘上的文件
pub(crate) struct PendingPresentation {
    file: File,
    path: PathBuf,
    relative: String,
    extension: String,
    written: usize,
    max_size: usize,
    committed: bool,
}

impl PendingPresentation {
    pub(crate) fn create(config: &UploadConfig, file_name: &str) -> ServiceResult<Self> {
        let extension = extension_of(file_name)
            .filter(|ext| config.allows_extension(ext))
            .ok_or_else(|| {
                ServiceError::BadRequest(
                    ErrorCode::FileTypeNotAllowed,
                    "File type not allowed".to_string(),
                )
            })?;

        let dir = Path::new(&config.dir).join(PRESENTATION_DIR);
        fs::create_dir_all(&dir)
            .map_err(|e| LmsError::file_operation(format!("创建上传目录失败: {e}")))?;

        let stored_name = format!(
            "{}-{}{}",
            chrono::Utc::now().timestamp(),
            Uuid::new_v4(),
            extension
        );
        let path = dir.join(&stored_name);
        let file = File::create(&path)
            .map_err(|e| LmsError::file_operation(format!("文件创建失败: {e}")))?;

        Ok(Self {
            file,
            path,
            relative: format!("{PRESENTATION_DIR}/{stored_name}"),
            extension,
            written: 0,
            max_size: config.max_size,
            committed: false,
        })
    }

    /// 第一个非空数据块用来校验魔术字节
    pub(crate) fn write_chunk(&mut self, data: &[u8]) -> ServiceResult<()> {
        if data.is_empty() {
            return Ok(());
        }
        if self.written == 0 && !validate_magic_bytes(data, &self.extension) {
            return Err(ServiceError::BadRequest(
                ErrorCode::FileTypeNotAllowed,
                "File content does not match its extension".to_string(),
            ));
        }

        self.written += data.len();
        if self.written > self.max_size {
            return Err(ServiceError::BadRequest(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit".to_string(),
            ));
        }

        self.file
            .write_all(data)
            .map_err(|e| LmsError::file_operation(format!("写入文件失败: {e}")))?;
        Ok(())
    }

    /// 返回相对上传目录的路径
    pub(crate) fn commit(mut self) -> ServiceResult<String> {
        if self.written == 0 {
            return Err(ServiceError::field("file", EMPTY_FILE));
        }
        self.file
            .flush()
            .map_err(|e| LmsError::file_operation(format!("写入文件失败: {e}")))?;
        self.committed = true;
        Ok(std::mem::take(&mut self.relative))
    }
}

impl Drop for PendingPresentation {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// 写入新路径；失败时删除新文件，成功后删除旧文件
pub(crate) async fn attach(
    storage: &dyn Storage,
    upload_dir: &str,
    lecture: Lecture,
    relative: String,
) -> ServiceResult<Lecture> {
    let updated = match storage
        .set_lecture_presentation(lecture.id, Some(relative.clone()))
        .await
    {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            remove_presentation(upload_dir, &relative);
            return Err(ServiceError::not_found(
                ErrorCode::LectureNotFound,
                "Lecture does not exist",
            ));
        }
        Err(e) => {
            remove_presentation(upload_dir, &relative);
            return Err(e.into());
        }
    };

    if let Some(old) = lecture.presentation.filter(|old| *old != relative) {
        remove_presentation(upload_dir, &old);
    }
    Ok(updated)
}

/// 只删除课件目录内的文件，文件已不存在时忽略
pub(crate) fn remove_presentation(upload_dir: &str, relative: &str) {
    let relative_path = Path::new(relative);
    let inside = relative_path.starts_with(PRESENTATION_DIR)
        && relative_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !inside {
        warn!("Refusing to remove presentation outside upload dir: {}", relative);
        return;
    }

    match fs::remove_file(Path::new(upload_dir).join(relative_path)) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove presentation {}: {}", relative, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{classroom, storage};

    fn upload_config(max_size: usize) -> UploadConfig {
        let dir = std::env::temp_dir().join(format!("lms-upload-{}", Uuid::new_v4()));
        UploadConfig {
            dir: dir.to_string_lossy().into_owned(),
            max_size,
            allowed_types: vec![".pdf".into(), ".pptx".into()],
        }
    }

    fn stored(config: &UploadConfig, relative: &str) -> PathBuf {
        Path::new(&config.dir).join(relative)
    }

    #[test]
    fn test_pending_presentation_commit() {
        let config = upload_config(1024);
        let mut file = PendingPresentation::create(&config, "Slides.PDF").unwrap();
        file.write_chunk(b"%PDF-1.7 ").unwrap();
        file.write_chunk(b"body").unwrap();
        let relative = file.commit().unwrap();

        assert!(relative.starts_with("presentations/"));
        assert!(relative.ends_with(".pdf"));
        assert_eq!(fs::read(stored(&config, &relative)).unwrap(), b"%PDF-1.7 body");

        let _ = fs::remove_dir_all(&config.dir);
    }

    #[test]
    fn test_pending_presentation_rejections() {
        let config = upload_config(8);

        assert!(matches!(
            PendingPresentation::create(&config, "notes.txt"),
            Err(ServiceError::BadRequest(ErrorCode::FileTypeNotAllowed, _))
        ));

        let mut file = PendingPresentation::create(&config, "slides.pdf").unwrap();
        assert!(matches!(
            file.write_chunk(b"PK\x03\x04"),
            Err(ServiceError::BadRequest(ErrorCode::FileTypeNotAllowed, _))
        ));
        let path = file.path.clone();
        drop(file);
        assert!(!path.exists());

        let mut file = PendingPresentation::create(&config, "slides.pdf").unwrap();
        file.write_chunk(b"%PDF-1.7").unwrap();
        assert!(matches!(
            file.write_chunk(b"more"),
            Err(ServiceError::BadRequest(ErrorCode::FileSizeExceeded, _))
        ));

        let file = PendingPresentation::create(&config, "slides.pdf").unwrap();
        assert!(matches!(file.commit(), Err(ServiceError::Validation(_))));

        let _ = fs::remove_dir_all(&config.dir);
    }

    #[tokio::test]
    async fn test_attach_replaces_old_file() {
        let storage = storage().await;
        let room = classroom(&storage, 0).await;
        let config = upload_config(1024);

        let mut first = PendingPresentation::create(&config, "v1.pdf").unwrap();
        first.write_chunk(b"%PDF-1").unwrap();
        let first = first.commit().unwrap();
        let lecture = attach(&storage, &config.dir, room.lecture, first.clone())
            .await
            .unwrap();
        assert_eq!(lecture.presentation.as_deref(), Some(first.as_str()));

        let mut second = PendingPresentation::create(&config, "v2.pdf").unwrap();
        second.write_chunk(b"%PDF-2").unwrap();
        let second = second.commit().unwrap();
        let lecture = attach(&storage, &config.dir, lecture, second.clone())
            .await
            .unwrap();

        assert_eq!(lecture.presentation.as_deref(), Some(second.as_str()));
        assert!(!stored(&config, &first).exists());
        assert!(stored(&config, &second).exists());

        let _ = fs::remove_dir_all(&config.dir);
    }

    #[test]
    fn test_remove_presentation_stays_inside_dir() {
        let config = upload_config(1024);
        let outside = Path::new(&config.dir).join("keep.pdf");
        fs::create_dir_all(&config.dir).unwrap();
        fs::write(&outside, b"%PDF").unwrap();

        remove_presentation(&config.dir, "presentations/../keep.pdf");
        remove_presentation(&config.dir, "keep.pdf");
        assert!(outside.exists());

        // 不存在的文件直接忽略
        remove_presentation(&config.dir, "presentations/missing.pdf");

        let _ = fs::remove_dir_all(&config.dir);
    }
}
