//! Access and refresh token issuance and verification.
//!
//! Both token kinds share the [`Claims`] shape; `token_use` keeps a
//! refresh token from being replayed as an access token and vice versa.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{Claims, TokenUse, User};
use crate::utils::errors::AppError;

pub fn create_access_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
    create_token(user, TokenUse::Access, jwt_config.access_token_expiry, jwt_config)
}

pub fn create_refresh_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
    create_token(user, TokenUse::Refresh, jwt_config.refresh_token_expiry, jwt_config)
}

fn create_token(
    user: &User,
    token_use: TokenUse,
    lifetime_seconds: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role,
        token_use,
        jti: Uuid::new_v4(),
        exp: now + lifetime_seconds as usize,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    verify_token(token, TokenUse::Access, jwt_config)
}

pub fn verify_refresh_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    verify_token(token, TokenUse::Refresh, jwt_config)
}

fn verify_token(
    token: &str,
    expected_use: TokenUse,
    jwt_config: &JwtConfig,
) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    if claims.token_use != expected_use {
        return Err(AppError::unauthorized("Invalid or expired token"));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::model::Role;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "proctor1".to_string(),
            first_name: "Pat".to_string(),
            last_name: "Proctor".to_string(),
            email: "proctor1@example.com".to_string(),
            role: Role::Proctor,
            email_verified: false,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let user = test_user();
        let config = test_config();

        let token = create_access_token(&user, &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "proctor1");
        assert_eq!(claims.role, Role::Proctor);
        assert_eq!(claims.token_use, TokenUse::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access_token() {
        let user = test_user();
        let config = test_config();

        let refresh = create_refresh_token(&user, &config).unwrap();
        assert!(verify_access_token(&refresh, &config).is_err());
        assert!(verify_refresh_token(&refresh, &config).is_ok());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let user = test_user();
        let config = test_config();

        let token = create_access_token(&user, &config).unwrap();
        let other = JwtConfig {
            secret: "different-secret".to_string(),
            ..config
        };
        assert!(verify_access_token(&token, &other).is_err());
    }

    #[test]
    fn test_tokens_carry_distinct_jtis() {
        let user = test_user();
        let config = test_config();

        let a = verify_refresh_token(&create_refresh_token(&user, &config).unwrap(), &config)
            .unwrap();
        let b = verify_refresh_token(&create_refresh_token(&user, &config).unwrap(), &config)
            .unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
