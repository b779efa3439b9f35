//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod courses;
mod grade_comments;
mod grades;
mod homeworks;
mod lectures;
mod submissions;
mod token_blacklist;
mod users;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::common::pagination::total_pages;
use crate::models::{Page, PageRequest};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite 实例（单连接），已执行全部迁移
    pub async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("内存数据库连接失败: {e}")))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 按页读取，page 从 1 开始
    pub(crate) async fn fetch_page<E, M>(
        &self,
        select: Select<E>,
        page: PageRequest,
        what: &str,
    ) -> Result<Page<M>>
    where
        E: EntityTrait<Model = M>,
        M: FromQueryResult + Sized + Send + Sync + 'static,
    {
        let paginator = select.paginate(&self.db, page.page_size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询{what}总数失败: {e}")))?;

        let pages = total_pages(total, page.page_size);

        // 超出末页时不再查询，也避免 page * page_size 溢出
        let in_range =
            page.page <= pages && (page.page - 1).checked_mul(page.page_size).is_some();
        let items = if in_range {
            paginator
                .fetch_page(page.page - 1)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询{what}列表失败: {e}")))?
        } else {
            Vec::new()
        };

        Ok(Page {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
            total_pages: pages,
        })
    }
}


// Storage trait 实现
use crate::models::{
    courses::{
        entities::{Course, CourseAccess},
        requests::{NewCourse, UpdateCourseRequest},
    },
    grade_comments::entities::GradeComment,
    grades::{entities::Grade, requests::UpdateGradeRequest},
    homeworks::{
        entities::Homework,
        requests::{NewHomework, UpdateHomeworkRequest},
    },
    lectures::{entities::Lecture, requests::UpdateLectureRequest},
    submissions::{entities::Submission, requests::UpdateSubmissionRequest},
    users::{
        entities::User,
        requests::{CreateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
        page: PageRequest,
    ) -> Result<Page<User>> {
        self.list_users_with_pagination_impl(query, page).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 令牌黑名单
    async fn blacklist_token(
        &self,
        jti: &str,
        user_id: i64,
        token_type: &str,
        expires_at: i64,
    ) -> Result<bool> {
        self.blacklist_token_impl(jti, user_id, token_type, expires_at)
            .await
    }

    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool> {
        self.is_token_blacklisted_impl(jti).await
    }

    async fn purge_expired_blacklisted_tokens(&self, now: i64) -> Result<u64> {
        self.purge_expired_blacklisted_tokens_impl(now).await
    }

    // 课程模块
    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Course>> {
        self.list_courses_with_pagination_impl(search, page).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn course_name_exists(
        &self,
        name: &str,
        primary_owner_id: i64,
        exclude_course_id: Option<i64>,
    ) -> Result<bool> {
        self.course_name_exists_impl(name, primary_owner_id, exclude_course_id)
            .await
    }

    async fn get_course_access(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<CourseAccess>> {
        self.get_course_access_impl(course_id, user_id).await
    }

    async fn list_course_teachers(&self, course_id: i64) -> Result<Vec<User>> {
        self.list_course_teachers_impl(course_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<User>> {
        self.list_course_students_impl(course_id).await
    }

    async fn count_course_members(&self, course_ids: &[i64]) -> Result<HashMap<i64, (i64, i64)>> {
        self.count_course_members_impl(course_ids).await
    }

    // 课时模块
    async fn create_lecture(&self, course_id: i64, topic: &str) -> Result<Lecture> {
        self.create_lecture_impl(course_id, topic).await
    }

    async fn get_lecture_by_id(&self, lecture_id: i64) -> Result<Option<Lecture>> {
        self.get_lecture_by_id_impl(lecture_id).await
    }

    async fn list_lectures_with_pagination(
        &self,
        course_id: i64,
        page: PageRequest,
    ) -> Result<Page<Lecture>> {
        self.list_lectures_with_pagination_impl(course_id, page)
            .await
    }

    async fn update_lecture(
        &self,
        lecture_id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>> {
        self.update_lecture_impl(lecture_id, update).await
    }

    async fn set_lecture_presentation(
        &self,
        lecture_id: i64,
        presentation: Option<String>,
    ) -> Result<Option<Lecture>> {
        self.set_lecture_presentation_impl(lecture_id, presentation)
            .await
    }

    async fn delete_lecture(&self, lecture_id: i64) -> Result<bool> {
        self.delete_lecture_impl(lecture_id).await
    }

    async fn lecture_topic_exists(
        &self,
        course_id: i64,
        topic: &str,
        exclude_lecture_id: Option<i64>,
    ) -> Result<bool> {
        self.lecture_topic_exists_impl(course_id, topic, exclude_lecture_id)
            .await
    }

    // 作业模块
    async fn create_homework(&self, homework: NewHomework) -> Result<Homework> {
        self.create_homework_impl(homework).await
    }

    async fn get_homework_by_id(&self, homework_id: i64) -> Result<Option<Homework>> {
        self.get_homework_by_id_impl(homework_id).await
    }

    async fn list_homeworks_with_pagination(
        &self,
        lecture_id: i64,
        page: PageRequest,
    ) -> Result<Page<Homework>> {
        self.list_homeworks_with_pagination_impl(lecture_id, page)
            .await
    }

    async fn update_homework(
        &self,
        homework_id: i64,
        update: UpdateHomeworkRequest,
    ) -> Result<Option<Homework>> {
        self.update_homework_impl(homework_id, update).await
    }

    async fn delete_homework(&self, homework_id: i64) -> Result<bool> {
        self.delete_homework_impl(homework_id).await
    }

    async fn homework_title_exists(
        &self,
        lecture_id: i64,
        title: &str,
        exclude_homework_id: Option<i64>,
    ) -> Result<bool> {
        self.homework_title_exists_impl(lecture_id, title, exclude_homework_id)
            .await
    }

    // 提交模块
    async fn create_submission(
        &self,
        homework_id: i64,
        student_id: i64,
        content: &str,
    ) -> Result<Submission> {
        self.create_submission_impl(homework_id, student_id, content)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn list_submissions_with_pagination(
        &self,
        homework_id: i64,
        student_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Page<Submission>> {
        self.list_submissions_with_pagination_impl(homework_id, student_id, page)
            .await
    }

    async fn update_submission(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        self.update_submission_impl(submission_id, update).await
    }

    async fn delete_submission(&self, submission_id: i64) -> Result<bool> {
        self.delete_submission_impl(submission_id).await
    }

    async fn submission_exists(&self, homework_id: i64, student_id: i64) -> Result<bool> {
        self.submission_exists_impl(homework_id, student_id).await
    }

    // 评分模块
    async fn create_grade(
        &self,
        submission_id: i64,
        grade: Option<f64>,
        comments: &str,
        graded_by: i64,
    ) -> Result<Grade> {
        self.create_grade_impl(submission_id, grade, comments, graded_by)
            .await
    }

    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(grade_id).await
    }

    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_submission_id_impl(submission_id).await
    }

    async fn list_grades_with_pagination(
        &self,
        submission_id: i64,
        page: PageRequest,
    ) -> Result<Page<Grade>> {
        self.list_grades_with_pagination_impl(submission_id, page)
            .await
    }

    async fn update_grade(
        &self,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        self.update_grade_impl(grade_id, update).await
    }

    async fn delete_grade(&self, grade_id: i64) -> Result<bool> {
        self.delete_grade_impl(grade_id).await
    }

    // 评分讨论
    async fn create_grade_comment(
        &self,
        grade_id: i64,
        author_id: i64,
        comment: &str,
    ) -> Result<GradeComment> {
        self.create_grade_comment_impl(grade_id, author_id, comment)
            .await
    }

    async fn list_grade_comments_with_pagination(
        &self,
        grade_id: i64,
        page: PageRequest,
    ) -> Result<Page<GradeComment>> {
        self.list_grade_comments_with_pagination_impl(grade_id, page)
            .await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::courses::{entities::Course, requests::NewCourse};
    use crate::models::homeworks::{entities::Homework, requests::NewHomework};
    use crate::models::lectures::entities::Lecture;
    use crate::models::users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    };

    pub async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory()
            .await
            .expect("in-memory storage")
    }

    pub async fn user(storage: &SeaOrmStorage, email: &str, role: UserRole) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                role,
            })
            .await
            .expect("create user")
    }

    /// 一门课程、一个课时、一份作业，以及已选课的学生
    pub struct Classroom {
        pub teacher: User,
        pub students: Vec<User>,
        pub course: Course,
        pub lecture: Lecture,
        pub homework: Homework,
    }

    pub async fn classroom(storage: &SeaOrmStorage, student_count: usize) -> Classroom {
        let teacher = user(storage, "teacher@example.com", UserRole::Teacher).await;
        let mut students = Vec::new();
        for i in 0..student_count {
            students.push(user(storage, &format!("s{i}@example.com"), UserRole::Student).await);
        }

        let course = storage
            .create_course_impl(NewCourse {
                name: "Rust".into(),
                description: String::new(),
                primary_owner_id: teacher.id,
                teacher_ids: vec![],
                student_ids: students.iter().map(|s| s.id).collect(),
            })
            .await
            .expect("create course");
        let lecture = storage
            .create_lecture_impl(course.id, "Async")
            .await
            .expect("create lecture");
        let homework = storage
            .create_homework_impl(NewHomework {
                lecture_id: lecture.id,
                title: "Executor".into(),
                description: String::new(),
                due_date: chrono::Utc::now(),
                created_by: teacher.id,
            })
            .await
            .expect("create homework");

        Classroom {
            teacher,
            students,
            course,
            lecture,
            homework,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("lms.db").unwrap(),
            "sqlite://lms.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/lms").unwrap(),
            "postgres://u:p@localhost/lms"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
