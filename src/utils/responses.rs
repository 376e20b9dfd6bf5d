//! Success envelope returned by every endpoint.
//!
//! Counterpart of [`crate::utils::errors`]: where errors render as
//! `{status: "error", ...}`, successful handlers return
//! `{status: "success", message, data}` through [`success`].

use axum::{Json, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::errors::AppError;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Your request was processed successfully";

/// Handler return type: an enveloped payload or an [`AppError`].
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

/// Success envelope wrapping an operation's payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,
    pub data: T,
}

/// Success envelope shape, as documented in the OpenAPI schema.
#[derive(Serialize, ToSchema)]
pub struct SuccessResponse {
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Wraps `data` in the success envelope with the given message and HTTP
/// status code.
pub fn success<T: Serialize>(
    data: T,
    message: &str,
    code: StatusCode,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        code,
        Json(ApiResponse {
            status: "success",
            message: message.to_string(),
            data,
        }),
    )
}

/// [`success`] with the default message and a 200 status.
pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    success(data, DEFAULT_SUCCESS_MESSAGE, StatusCode::OK)
}
