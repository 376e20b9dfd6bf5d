//! PostgreSQL connection pool setup.
//!
//! Reads `DATABASE_URL` (required) and `DATABASE_MAX_CONNECTIONS`
//! (default 10). Panics on a missing URL or an unreachable database;
//! there is nothing useful the server can do without its datastore.

use std::env;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
