use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").ok());

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 150;
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("Email cannot be empty");
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err("Email is too long");
    }
    match EMAIL_RE.as_ref() {
        Some(re) if re.is_match(email) => Ok(()),
        _ => Err("Enter a valid email address"),
    }
}

/// 姓名校验，`empty_message` 区分名与姓
pub fn validate_name(name: &str, empty_message: &'static str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err(empty_message);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err("Ensure this field has no more than 150 characters");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters long");
    }
    Ok(())
}
