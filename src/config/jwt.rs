use std::env;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "insecure-dev-secret-change-me".to_string()),
            access_token_expiry: parse_seconds("JWT_ACCESS_EXPIRY", 3600),
            refresh_token_expiry: parse_seconds("JWT_REFRESH_EXPIRY", 604800),
        }
    }
}

fn parse_seconds(var: &str, default: i64) -> i64 {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
