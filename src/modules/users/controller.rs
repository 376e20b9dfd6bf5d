use axum::extract::State;
use axum::http::StatusCode;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::utils::responses::{ApiResult, SuccessResponse, success};
use crate::validator::ValidatedJson;

use super::model::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse,
    RegisterRequestDto, User,
};
use super::service::UserService;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = SuccessResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> ApiResult<User> {
    let user = UserService::register_user(&state.db, dto).await?;
    Ok(success(
        user,
        "User registered successfully",
        StatusCode::CREATED,
    ))
}

/// Login using username or email address
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "User logged in successfully", body = SuccessResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let tokens = UserService::authenticate_user(&state.db, dto, &state.jwt_config).await?;
    Ok(success(
        tokens,
        "User logged in successfully",
        StatusCode::OK,
    ))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/user/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = SuccessResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> ApiResult<RefreshResponse> {
    let refresh_token = dto
        .refresh
        .ok_or_else(|| AppError::unauthorized("No refresh token provided"))?;

    let response =
        UserService::refresh_access_token(&state.db, &refresh_token, &state.jwt_config).await?;
    Ok(success(
        response,
        "Token refreshed successfully",
        StatusCode::OK,
    ))
}

/// Logout by blacklisting the refresh token
#[utoipa::path(
    post,
    path = "/api/user/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "User logged out successfully", body = SuccessResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LogoutRequest>,
) -> ApiResult<serde_json::Value> {
    let refresh_token = dto
        .refresh
        .ok_or_else(|| AppError::unauthorized("No refresh token provided"))?;

    UserService::logout(&state.db, &refresh_token, &state.jwt_config).await?;
    Ok(success(
        serde_json::Value::Null,
        "User logged out successfully",
        StatusCode::OK,
    ))
}

/// Authenticated user info
#[utoipa::path(
    get,
    path = "/api/user/me",
    responses(
        (status = 200, description = "User details retrieved successfully", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<User> {
    let user = UserService::get_user(&state.db, auth_user.user_id()?).await?;
    Ok(success(
        user,
        "User details retrieved successfully",
        StatusCode::OK,
    ))
}
