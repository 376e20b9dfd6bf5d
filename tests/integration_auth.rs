mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    create_test_user, get_auth_token, login_response, response_json, setup_test_app,
    unique_username,
};
use invigil::modules::users::model::Role;

fn register_body(username: &str, email: &str, password: &str, role: &str) -> serde_json::Value {
    json!({
        "username": username,
        "first_name": "New",
        "last_name": "User",
        "email": email,
        "password": password,
        "role": role
    })
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_success(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = unique_username();

    let request = post_json(
        "/api/user/register",
        &register_body(&username, &format!("{username}@test.com"), "Str0ng-pass!", "candidate"),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["username"], username);
    assert_eq!(body["data"]["role"], "candidate");
    // The password hash must never appear in a response.
    assert!(body["data"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let username = unique_username();
    create_test_user(&mut tx, &username, "Str0ng-pass!", Role::Candidate).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool);
    let request = post_json(
        "/api/user/register",
        &register_body(&username, "other@test.com", "Str0ng-pass!", "candidate"),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Username already exists");
    assert!(body["errors"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_weak_password(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = unique_username();

    let request = post_json(
        "/api/user/register",
        &register_body(&username, &format!("{username}@test.com"), "weakpass", "candidate"),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(
        body["errors"]["password"][0]
            .as_str()
            .unwrap()
            .starts_with("Password must contain")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_missing_field_is_enveloped(pool: PgPool) {
    let app = setup_test_app(pool);

    let request = post_json(
        "/api/user/register",
        &json!({
            "username": unique_username(),
            "first_name": "No",
            "last_name": "Email",
            "password": "Str0ng-pass!",
            "role": "candidate"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "email is required");
    assert!(body["errors"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_and_me(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let username = unique_username();
    let user = create_test_user(&mut tx, &username, "Str0ng-pass!", Role::Proctor).await;
    tx.commit().await.unwrap();

    let body = login_response(setup_test_app(pool.clone()), &username, "Str0ng-pass!").await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "User logged in successfully");
    assert!(body["data"]["access"].is_string());
    assert!(body["data"]["refresh"].is_string());
    assert!(body["data"]["access_lifetime"].is_i64());
    assert_eq!(body["data"]["user"]["email"], user.email);

    let token = body["data"]["access"].as_str().unwrap();
    let request = Request::builder()
        .method("GET")
        .uri("/api/user/me")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = setup_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "User details retrieved successfully");
    assert_eq!(body["data"]["username"], username);
    assert_eq!(body["data"]["role"], "proctor");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_email(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let username = unique_username();
    let user = create_test_user(&mut tx, &username, "Str0ng-pass!", Role::Candidate).await;
    tx.commit().await.unwrap();

    let body = login_response(setup_test_app(pool), &user.email, "Str0ng-pass!").await;
    assert_eq!(body["status"], "success");
    assert!(body["data"]["access"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let username = unique_username();
    create_test_user(&mut tx, &username, "Str0ng-pass!", Role::Candidate).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool);
    let request = post_json(
        "/api/user/login",
        &json!({"username": username, "password": "wrong-password"}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_flow(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let username = unique_username();
    create_test_user(&mut tx, &username, "Str0ng-pass!", Role::Candidate).await;
    tx.commit().await.unwrap();

    let login = login_response(setup_test_app(pool.clone()), &username, "Str0ng-pass!").await;
    let refresh_token = login["data"]["refresh"].as_str().unwrap();

    let request = post_json("/api/user/refresh", &json!({"refresh": refresh_token}));
    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Token refreshed successfully");
    let access = body["data"]["access"].as_str().unwrap();

    // The refreshed access token works against a protected endpoint.
    let request = Request::builder()
        .method("GET")
        .uri("/api/user/me")
        .header("authorization", format!("Bearer {access}"))
        .body(Body::empty())
        .unwrap();
    let response = setup_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_without_token(pool: PgPool) {
    let app = setup_test_app(pool);
    let request = post_json("/api/user/refresh", &json!({}));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["message"], "No refresh token provided");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_blacklists_refresh_token(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let username = unique_username();
    create_test_user(&mut tx, &username, "Str0ng-pass!", Role::Candidate).await;
    tx.commit().await.unwrap();

    let login = login_response(setup_test_app(pool.clone()), &username, "Str0ng-pass!").await;
    let refresh_token = login["data"]["refresh"].as_str().unwrap().to_string();

    let request = post_json("/api/user/logout", &json!({"refresh": refresh_token}));
    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "User logged out successfully");

    // The blacklisted token can no longer be exchanged.
    let request = post_json("/api/user/refresh", &json!({"refresh": refresh_token}));
    let response = setup_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_without_token(pool: PgPool) {
    let app = setup_test_app(pool);
    let request = Request::builder()
        .method("GET")
        .uri("/api/user/me")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Missing authorization header");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_last_login_is_stamped(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let username = unique_username();
    create_test_user(&mut tx, &username, "Str0ng-pass!", Role::Candidate).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());
    let token = get_auth_token(app, &username, "Str0ng-pass!").await;
    assert!(!token.is_empty());

    let (last_login,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT last_login FROM users WHERE username = $1")
            .bind(&username)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login.is_some());
}
