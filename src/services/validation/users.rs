use crate::models::auth::RegisterRequest;
use crate::models::users::entities::{User, UserRole};
use crate::services::ServiceResult;
use crate::storage::Storage;
use crate::utils::validate::{validate_email, validate_name, validate_password};

use super::ValidationErrors;

pub const USER_DOESNT_EXIST: &str = "User does not exist";
pub const EMAIL_ALREADY_EXISTS: &str = "A user with this email already exists";

/// 用户存在且角色匹配；失败时给出不带前缀的错误信息
pub async fn validate_user_role(
    storage: &dyn Storage,
    user_id: i64,
    role: UserRole,
) -> ServiceResult<Result<User, &'static str>> {
    let Some(user) = storage.get_user_by_id(user_id).await? else {
        return Ok(Err(USER_DOESNT_EXIST));
    };

    if user.role != role {
        return Ok(Err(match role {
            UserRole::Teacher => "User must be teacher",
            UserRole::Student => "User must be student",
        }));
    }

    Ok(Ok(user))
}

/// 注册表单校验，错误按字段归类
pub async fn validate_registration(
    storage: &dyn Storage,
    request: &RegisterRequest,
) -> ServiceResult<ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let email = request.email.trim();

    match validate_email(email) {
        Ok(()) => {
            if storage.get_user_by_email(email).await?.is_some() {
                errors.add("email", EMAIL_ALREADY_EXISTS);
            }
        }
        Err(msg) => errors.add("email", msg),
    }

    if let Err(msg) = validate_name(&request.first_name, "First name cannot be empty") {
        errors.add("first_name", msg);
    }
    if let Err(msg) = validate_name(&request.last_name, "Last name cannot be empty") {
        errors.add("last_name", msg);
    }

    if let Err(msg) = validate_password(&request.password) {
        errors.add("password", msg);
    }
    if request.password != request.password_confirm {
        errors.add("password_confirm", "Passwords do not match");
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{storage, user};

    fn request(email: &str, password_confirm: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: None,
            password: "correct-horse".to_string(),
            password_confirm: password_confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_role() {
        let storage = storage().await;
        let teacher = user(&storage, "t@example.com", UserRole::Teacher).await;

        assert!(
            validate_user_role(&storage, teacher.id, UserRole::Teacher)
                .await
                .unwrap()
                .is_ok()
        );
        assert_eq!(
            validate_user_role(&storage, teacher.id, UserRole::Student)
                .await
                .unwrap()
                .unwrap_err(),
            "User must be student"
        );
        assert_eq!(
            validate_user_role(&storage, 9999, UserRole::Teacher)
                .await
                .unwrap()
                .unwrap_err(),
            USER_DOESNT_EXIST
        );
    }

    #[tokio::test]
    async fn test_registration_errors_by_field() {
        let storage = storage().await;
        user(&storage, "taken@example.com", UserRole::Student).await;

        let errors = validate_registration(&storage, &request("new@example.com", "correct-horse"))
            .await
            .unwrap();
        assert!(errors.is_empty());

        let errors = validate_registration(&storage, &request("taken@example.com", "other"))
            .await
            .unwrap();
        assert_eq!(errors.field("email"), [EMAIL_ALREADY_EXISTS]);
        assert_eq!(errors.field("password_confirm"), ["Passwords do not match"]);

        let mut blank = request("not-an-email", "correct-horse");
        blank.first_name = "  ".into();
        let errors = validate_registration(&storage, &blank).await.unwrap();
        assert_eq!(errors.field("email").len(), 1);
        assert_eq!(errors.field("first_name"), ["First name cannot be empty"]);
    }
}
