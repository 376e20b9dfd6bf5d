use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{
    LoginRequest, LoginResponse, RefreshResponse, RegisterRequestDto, Role, User,
};
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::utils::password::{hash_password, verify_password};

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, email, role, email_verified, last_login, created_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let taken: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(&dto.username)
                .fetch_one(db)
                .await?;

        if taken.0 {
            return Err(AppError::conflict("Username already exists"));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, first_name, last_name, email, password, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.role)
        .fetch_one(db)
        .await
        .map_err(map_user_unique_violation)?;

        Ok(user)
    }

    /// Authenticates by username or email and issues a token pair.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn authenticate_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(FromRow)]
        struct UserWithPassword {
            id: Uuid,
            password: String,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, password FROM users WHERE username = $1 OR email = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !verify_password(&dto.password, &row.password)? {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(row.id)
        .fetch_one(db)
        .await?;

        let access = create_access_token(&user, jwt_config)?;
        let refresh = create_refresh_token(&user, jwt_config)?;

        Ok(LoginResponse {
            access,
            refresh,
            access_lifetime: jwt_config.access_token_expiry,
            refresh_lifetime: jwt_config.refresh_token_expiry,
            user,
        })
    }

    /// Exchanges a valid, non-blacklisted refresh token for a new access
    /// token.
    #[instrument(skip_all)]
    pub async fn refresh_access_token(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;

        let blacklisted: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM blacklisted_tokens WHERE jti = $1)")
                .bind(claims.jti)
                .fetch_one(db)
                .await?;

        if blacklisted.0 {
            return Err(AppError::unauthorized("Invalid or expired token"));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        let user = Self::find_user(db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        let access = create_access_token(&user, jwt_config)?;
        Ok(RefreshResponse { access })
    }

    /// Blacklists the refresh token's jti so it can no longer be exchanged.
    #[instrument(skip_all)]
    pub async fn logout(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<(), AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp as i64, 0)
            .unwrap_or_else(Utc::now);

        sqlx::query(
            "INSERT INTO blacklisted_tokens (jti, expires_at) VALUES ($1, $2)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(claims.jti)
        .bind(expires_at)
        .execute(db)
        .await?;

        Ok(())
    }

    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        Self::find_user(db, id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn list_by_role(db: &PgPool, role: Role) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at"
        ))
        .bind(role)
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    async fn find_user(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }
}

/// Turns the users table's unique constraints into Conflict errors; a
/// lost pre-check race must not surface as a 500.
fn map_user_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some(constraint) if constraint.contains("email") => "Email already exists",
                _ => "Username already exists",
            };
            return AppError::conflict(message);
        }
    }
    AppError::internal(err)
}
