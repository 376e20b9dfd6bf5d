//! User entity, JWT claims, and auth request/response DTOs.
//!
//! [`Role`] is a closed enumeration backed by the `user_role` Postgres
//! enum; authorization decisions match on it exhaustively instead of
//! comparing strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::password::validate_password_strength;

/// System role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Proctor,
    Candidate,
}

/// A registered user. The password hash never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Whether a token is usable for API access or only for refreshing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token_use: TokenUse,
    /// Token id, recorded in the blacklist on logout.
    pub jti: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 150, message = "Username must be 1 to 150 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "First name may not be blank"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name may not be blank"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = validate_password_strength))]
    pub password: String,
    pub role: Role,
}

/// Login accepts either the username or the email address in `username`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username may not be blank"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password may not be blank"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    /// Access token lifetime in seconds.
    pub access_lifetime: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_lifetime: i64,
    pub user: User,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LogoutRequest {
    pub refresh: Option<String>,
}
