use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    Page, PageRequest,
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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 批量获取用户，结果顺序不保证
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
        page: PageRequest,
    ) -> Result<Page<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 令牌黑名单
    // 加入黑名单，已存在时返回 false
    async fn blacklist_token(
        &self,
        jti: &str,
        user_id: i64,
        token_type: &str,
        expires_at: i64,
    ) -> Result<bool>;
    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool>;
    // 清理已过期的黑名单记录
    async fn purge_expired_blacklisted_tokens(&self, now: i64) -> Result<u64>;

    /// 课程管理方法
    // 创建课程及教师、学生关系（单事务）
    async fn create_course(&self, course: NewCourse) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Course>>;
    // 更新课程，提供 teacher_ids/student_ids 时整体替换（单事务）
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    // 同一负责人下是否已有同名课程
    async fn course_name_exists(
        &self,
        name: &str,
        primary_owner_id: i64,
        exclude_course_id: Option<i64>,
    ) -> Result<bool>;
    // 用户与课程的关系
    async fn get_course_access(&self, course_id: i64, user_id: i64)
    -> Result<Option<CourseAccess>>;
    async fn list_course_teachers(&self, course_id: i64) -> Result<Vec<User>>;
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<User>>;
    // 课程 ID -> (教师数, 学生数)
    async fn count_course_members(&self, course_ids: &[i64]) -> Result<HashMap<i64, (i64, i64)>>;

    /// 课时管理方法
    async fn create_lecture(&self, course_id: i64, topic: &str) -> Result<Lecture>;
    async fn get_lecture_by_id(&self, lecture_id: i64) -> Result<Option<Lecture>>;
    async fn list_lectures_with_pagination(
        &self,
        course_id: i64,
        page: PageRequest,
    ) -> Result<Page<Lecture>>;
    async fn update_lecture(
        &self,
        lecture_id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>>;
    async fn set_lecture_presentation(
        &self,
        lecture_id: i64,
        presentation: Option<String>,
    ) -> Result<Option<Lecture>>;
    async fn delete_lecture(&self, lecture_id: i64) -> Result<bool>;
    async fn lecture_topic_exists(
        &self,
        course_id: i64,
        topic: &str,
        exclude_lecture_id: Option<i64>,
    ) -> Result<bool>;

    /// 作业管理方法
    async fn create_homework(&self, homework: NewHomework) -> Result<Homework>;
    async fn get_homework_by_id(&self, homework_id: i64) -> Result<Option<Homework>>;
    async fn list_homeworks_with_pagination(
        &self,
        lecture_id: i64,
        page: PageRequest,
    ) -> Result<Page<Homework>>;
    async fn update_homework(
        &self,
        homework_id: i64,
        update: UpdateHomeworkRequest,
    ) -> Result<Option<Homework>>;
    async fn delete_homework(&self, homework_id: i64) -> Result<bool>;
    async fn homework_title_exists(
        &self,
        lecture_id: i64,
        title: &str,
        exclude_homework_id: Option<i64>,
    ) -> Result<bool>;

    /// 提交管理方法
    async fn create_submission(
        &self,
        homework_id: i64,
        student_id: i64,
        content: &str,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // student_id 为 Some 时只返回该学生的提交
    async fn list_submissions_with_pagination(
        &self,
        homework_id: i64,
        student_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Page<Submission>>;
    async fn update_submission(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>>;
    async fn delete_submission(&self, submission_id: i64) -> Result<bool>;
    async fn submission_exists(&self, homework_id: i64, student_id: i64) -> Result<bool>;

    /// 评分管理方法
    async fn create_grade(
        &self,
        submission_id: i64,
        grade: Option<f64>,
        comments: &str,
        graded_by: i64,
    ) -> Result<Grade>;
    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>>;
    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>>;
    async fn list_grades_with_pagination(
        &self,
        submission_id: i64,
        page: PageRequest,
    ) -> Result<Page<Grade>>;
    async fn update_grade(&self, grade_id: i64, update: UpdateGradeRequest)
    -> Result<Option<Grade>>;
    async fn delete_grade(&self, grade_id: i64) -> Result<bool>;

    /// 评分讨论
    async fn create_grade_comment(
        &self,
        grade_id: i64,
        author_id: i64,
        comment: &str,
    ) -> Result<GradeComment>;
    async fn list_grade_comments_with_pagination(
        &self,
        grade_id: i64,
        page: PageRequest,
    ) -> Result<Page<GradeComment>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
