use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::course_students::{
    self, ActiveModel as CourseStudentActiveModel, Entity as CourseStudents,
};
use crate::entity::course_teachers::{
    self, ActiveModel as CourseTeacherActiveModel, Entity as CourseTeachers,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{LmsError, Result};
use crate::models::{
    Page, PageRequest,
    courses::{
        entities::{Course, CourseAccess},
        requests::{NewCourse, UpdateCourseRequest},
    },
    users::entities::User,
};
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 去重并保持原有顺序
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

async fn insert_teachers(
    txn: &DatabaseTransaction,
    course_id: i64,
    user_ids: &[i64],
    now: i64,
) -> Result<()> {
    for user_id in unique_ids(user_ids) {
        CourseTeacherActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            added_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("添加课程教师失败: {e}")))?;
    }
    Ok(())
}

async fn insert_students(
    txn: &DatabaseTransaction,
    course_id: i64,
    user_ids: &[i64],
    now: i64,
) -> Result<()> {
    for user_id in unique_ids(user_ids) {
        CourseStudentActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            enrolled_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("添加课程学生失败: {e}")))?;
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建课程，课程与教师、学生关系在同一事务中写入
    pub async fn create_course_impl(&self, req: NewCourse) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let course = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            primary_owner_id: Set(req.primary_owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("创建课程失败: {e}")))?;

        insert_teachers(&txn, course.id, &req.teacher_ids, now).await?;
        insert_students(&txn, course.id, &req.student_ids, now).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(course.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程，按创建时间倒序
    pub async fn list_courses_with_pagination_impl(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Course>> {
        let mut select = Courses::find();

        if let Some(ref search) = search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(contains_pattern(search.trim())));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let courses = self.fetch_page(select, page, "课程").await?;
        Ok(courses.map(|m| m.into_course()))
    }

    /// 更新课程，仅处理提供的字段
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Courses::find_by_id(course_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        if let Some(owner_id) = update.primary_owner_id {
            model.primary_owner_id = Set(owner_id);
        }

        model.updated_at = Set(now);

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课程失败: {e}")))?;

        if let Some(ref teacher_ids) = update.teacher_ids {
            CourseTeachers::delete_many()
                .filter(course_teachers::Column::CourseId.eq(course_id))
                .exec(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("清空课程教师失败: {e}")))?;
            insert_teachers(&txn, course_id, teacher_ids, now).await?;
        }

        if let Some(ref student_ids) = update.student_ids {
            CourseStudents::delete_many()
                .filter(course_students::Column::CourseId.eq(course_id))
                .exec(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("清空课程学生失败: {e}")))?;
            insert_students(&txn, course_id, student_ids, now).await?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_course()))
    }

    /// 删除课程，关联数据由外键级联删除
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 同一负责人下的课程名是否已存在
    pub async fn course_name_exists_impl(
        &self,
        name: &str,
        primary_owner_id: i64,
        exclude_course_id: Option<i64>,
    ) -> Result<bool> {
        let mut select = Courses::find()
            .filter(Column::Name.eq(name))
            .filter(Column::PrimaryOwnerId.eq(primary_owner_id));

        if let Some(exclude) = exclude_course_id {
            select = select.filter(Column::Id.ne(exclude));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程名失败: {e}")))?;

        Ok(count > 0)
    }

    /// 获取用户在课程中的身份
    pub async fn get_course_access_impl(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<CourseAccess>> {
        let Some(course) = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let teacher_count = CourseTeachers::find()
            .filter(course_teachers::Column::CourseId.eq(course_id))
            .filter(course_teachers::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程教师失败: {e}")))?;

        let student_count = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .filter(course_students::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程学生失败: {e}")))?;

        Ok(Some(CourseAccess {
            course_id,
            primary_owner_id: course.primary_owner_id,
            is_teacher: teacher_count > 0,
            is_student: student_count > 0,
        }))
    }

    /// 课程教师名单
    pub async fn list_course_teachers_impl(&self, course_id: i64) -> Result<Vec<User>> {
        let user_ids: Vec<i64> = CourseTeachers::find()
            .select_only()
            .column(course_teachers::Column::UserId)
            .filter(course_teachers::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程教师失败: {e}")))?;

        self.get_users_by_ids_impl(&user_ids).await
    }

    /// 课程学生名单
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<User>> {
        let user_ids: Vec<i64> = CourseStudents::find()
            .select_only()
            .column(course_students::Column::UserId)
            .filter(course_students::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程学生失败: {e}")))?;

        self.get_users_by_ids_impl(&user_ids).await
    }

    /// 统计多门课程的教师数与学生数
    pub async fn count_course_members_impl(
        &self,
        course_ids: &[i64],
    ) -> Result<HashMap<i64, (i64, i64)>> {
        let mut counts: HashMap<i64, (i64, i64)> =
            course_ids.iter().map(|id| (*id, (0, 0))).collect();
        if course_ids.is_empty() {
            return Ok(counts);
        }

        let teacher_rows: Vec<(i64, i64)> = CourseTeachers::find()
            .select_only()
            .column(course_teachers::Column::CourseId)
            .column_as(course_teachers::Column::Id.count(), "member_count")
            .filter(course_teachers::Column::CourseId.is_in(course_ids.to_vec()))
            .group_by(course_teachers::Column::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计课程教师失败: {e}")))?;

        let student_rows: Vec<(i64, i64)> = CourseStudents::find()
            .select_only()
            .column(course_students::Column::CourseId)
            .column_as(course_students::Column::Id.count(), "member_count")
            .filter(course_students::Column::CourseId.is_in(course_ids.to_vec()))
            .group_by(course_students::Column::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计课程学生失败: {e}")))?;

        for (course_id, count) in teacher_rows {
            counts.entry(course_id).or_default().0 = count;
        }
        for (course_id, count) in student_rows {
            counts.entry(course_id).or_default().1 = count;
        }

        Ok(counts)
    }
}
