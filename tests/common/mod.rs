use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

use invigil::config::cors::CorsConfig;
use invigil::config::jwt::JwtConfig;
use invigil::modules::users::model::Role;
use invigil::router::init_router;
use invigil::state::AppState;
use invigil::utils::password::hash_password;

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    password: &str,
    role: Role,
) -> TestUser {
    let hashed = hash_password(password).unwrap();
    let email = format!("{username}@test.com");

    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO users (username, first_name, last_name, email, password, role)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(username)
    .bind("Test")
    .bind("User")
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestUser {
        id: row.0,
        username: username.to_string(),
        email,
        password: password.to_string(),
    }
}

#[allow(dead_code)]
pub async fn create_test_exam(tx: &mut Transaction<'_, Postgres>, created_by: Uuid) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO exams (title, created_by, duration_minutes, passing_score)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(format!("Test Exam {}", Uuid::new_v4()))
    .bind(created_by)
    .bind(60)
    .bind(70.0_f64)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    row.0
}

#[allow(dead_code)]
pub async fn assign_proctor_row(
    tx: &mut Transaction<'_, Postgres>,
    exam_id: Uuid,
    proctor_id: Uuid,
    assigned_by: Uuid,
) {
    sqlx::query(
        "INSERT INTO exam_proctors (exam_id, proctor_id, assigned_by)
         VALUES ($1, $2, $3)",
    )
    .bind(exam_id)
    .bind(proctor_id)
    .bind(assigned_by)
    .execute(&mut **tx)
    .await
    .unwrap();
}

pub fn unique_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

/// Logs in through the API and returns the access token from the
/// response envelope.
pub async fn get_auth_token(app: axum::Router, username: &str, password: &str) -> String {
    let body = login_response(app, username, password).await;
    body["data"]["access"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn login_response(
    app: axum::Router,
    username: &str,
    password: &str,
) -> serde_json::Value {
    let request = Request::builder()
        .method("POST")
        .uri("/api/user/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
