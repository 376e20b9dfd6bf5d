//! Application error type and its JSON envelope rendering.
//!
//! Services return `Result<_, AppError>`; the single exhaustive match in
//! [`IntoResponse`] turns every variant into the uniform error envelope:
//!
//! ```json
//! { "status": "error", "message": "...", "errors": {...} }
//! ```
//!
//! `errors` carries the field-to-messages map for validation failures and
//! an empty list for everything else. When `APP_DEBUG` is enabled a
//! `trace` field with captured backtrace text is appended.

use std::backtrace::Backtrace;
use std::collections::BTreeMap;
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::config::app;

/// Map of field name to the list of messages raised for that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing the request";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Validation(FieldErrors),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The top-level envelope message for this error.
    ///
    /// Variants carrying a single detail string use it verbatim; the
    /// validation variant derives a summary from its field map.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(detail)
            | AppError::Unauthorized(detail)
            | AppError::Forbidden(detail)
            | AppError::NotFound(detail)
            | AppError::Conflict(detail) => detail.clone(),
            AppError::Validation(errors) => summarize_field_errors(errors),
            AppError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Derives a one-line summary from a field-error map: the first message of
/// the first field, with an `And N other error(s)` suffix when more than
/// one field failed.
pub fn summarize_field_errors(errors: &FieldErrors) -> String {
    let firsts: Vec<&String> = errors.values().filter_map(|msgs| msgs.first()).collect();

    match firsts.as_slice() {
        [] => GENERIC_ERROR_MESSAGE.to_string(),
        [only] => (*only).clone(),
        [first, rest @ ..] => {
            let suffix = if rest.len() == 1 { "error" } else { "errors" };
            format!("{} And {} other {}", first, rest.len(), suffix)
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let errors = match &self {
            AppError::Validation(map) => json!(map),
            _ => json!([]),
        };

        let mut body = json!({
            "status": "error",
            "message": self.message(),
            "errors": errors,
        });

        if app::debug_enabled() {
            let trace = match &self {
                AppError::Internal(err) => format!("{err:?}"),
                _ => Backtrace::force_capture().to_string(),
            };
            body["trace"] = json!(trace);
        }

        (self.status_code(), Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

/// Error envelope shape, as documented in the OpenAPI schema.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "error")]
    pub status: String,
    pub message: String,
    /// Field-to-messages map for validation failures, empty list otherwise.
    #[schema(value_type = Object)]
    pub errors: serde_json::Value,
}
