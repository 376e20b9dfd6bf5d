use std::borrow::Cow;

use bcrypt::{DEFAULT_COST, hash, verify};
use validator::ValidationError;

use crate::utils::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(AppError::internal)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed).map_err(AppError::internal)
}

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+{};:,<.>";

/// Registration password policy, used via `#[validate(custom(...))]`.
///
/// Requires at least 8 characters with one lowercase letter, one uppercase
/// letter, one digit, and one special character.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(policy_error("Password must be at least 8 characters long"));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(policy_error(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(policy_error(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(policy_error("Password must contain at least one digit"));
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(policy_error(
            "Password must contain at least one special character",
        ));
    }

    Ok(())
}

fn policy_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("password_strength");
    err.message = Some(Cow::Borrowed(message));
    err
}
