//! 预导入模块，方便使用

pub use super::course_students::{
    ActiveModel as CourseStudentActiveModel, Entity as CourseStudents,
    Model as CourseStudentModel,
};
pub use super::course_teachers::{
    ActiveModel as CourseTeacherActiveModel, Entity as CourseTeachers,
    Model as CourseTeacherModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::grade_comments::{
    ActiveModel as GradeCommentActiveModel, Entity as GradeComments, Model as GradeCommentModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::homeworks::{
    ActiveModel as HomeworkActiveModel, Entity as Homeworks, Model as HomeworkModel,
};
pub use super::lectures::{
    ActiveModel as LectureActiveModel, Entity as Lectures, Model as LectureModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::token_blacklist::{
    ActiveModel as TokenBlacklistActiveModel, Entity as TokenBlacklist,
    Model as TokenBlacklistModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
