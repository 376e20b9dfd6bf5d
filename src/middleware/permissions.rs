//! Role-based authorization gate.
//!
//! Two predicates, evaluated by mutating handlers before any service call
//! runs. Both take the HTTP method and the requesting principal as
//! explicit arguments and admit every safe (read-only) method
//! unconditionally, matching the deliberate relaxation this API ships
//! with: listing and retrieval are not privileged operations here.

use axum::http::Method;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::Role;
use crate::utils::errors::AppError;

pub const ADMIN_ONLY_MESSAGE: &str = "This action can be done only by admin";
pub const NOT_ASSIGNED_MESSAGE: &str = "You are not assigned to this exam";

/// HTTP methods that never mutate state.
pub fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Allows safe methods for anyone; everything else is admin-only.
pub fn admin_only(method: &Method, principal: &AuthUser) -> Result<(), AppError> {
    if is_safe_method(method) || principal.role() == Role::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden(ADMIN_ONLY_MESSAGE))
    }
}

/// Decision core of the assigned-proctor gate, separated from the
/// assignment lookup so it can be checked without a datastore.
pub fn proctor_assignment_allows(method: &Method, role: Role, has_assignment: bool) -> bool {
    is_safe_method(method) || (role == Role::Proctor && has_assignment)
}

/// Allows safe methods for anyone; mutating methods require the principal
/// to be a proctor with an assignment row for `exam_id`. A missing exam id
/// denies.
pub async fn assigned_proctor_only(
    db: &PgPool,
    method: &Method,
    principal: &AuthUser,
    exam_id: Option<Uuid>,
) -> Result<(), AppError> {
    if is_safe_method(method) {
        return Ok(());
    }

    let has_assignment = match exam_id {
        Some(exam_id) => assignment_exists(db, exam_id, principal.user_id()?).await?,
        None => false,
    };

    if proctor_assignment_allows(method, principal.role(), has_assignment) {
        Ok(())
    } else {
        Err(AppError::forbidden(NOT_ASSIGNED_MESSAGE))
    }
}

async fn assignment_exists(db: &PgPool, exam_id: Uuid, proctor_id: Uuid) -> Result<bool, AppError> {
    let exists: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM exam_proctors WHERE exam_id = $1 AND proctor_id = $2)",
    )
    .bind(exam_id)
    .bind(proctor_id)
    .fetch_one(db)
    .await?;

    Ok(exists.0)
}
