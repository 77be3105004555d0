//! Authentication and account API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = TestApp::new();
    let token = register_and_login(&app, "alice", "alice@example.com").await;

    let response = app.get("/user", &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["isAdmin"], false);
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_trims_fields() {
    let app = TestApp::new();
    let response = app
        .server
        .post("/user/register")
        .json(&json!({
            "username": "  bob  ",
            "email": " bob@example.com ",
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let user = app
        .store()
        .find_user_by_email("bob@example.com")
        .await
        .unwrap()
        .expect("registered user");
    assert_eq!(user.username, "bob");
    assert_ne!(user.password_hash, TEST_PASSWORD);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    register_and_login(&app, "alice", "alice@example.com").await;

    let response = app
        .server
        .post("/user/register")
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Email already in use");
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = TestApp::new();
    let cases = [
        (json!({"username": "al", "email": "a@example.com", "password": TEST_PASSWORD}),
            "Username must be between 3 and 25 characters."),
        (json!({"username": "alice", "email": "invalid-email", "password": TEST_PASSWORD}),
            "Please enter a valid email address"),
        (json!({"username": "alice", "email": "a@example.com", "password": "Pa1!"}),
            "Password must be at least 8 characters long"),
        (json!({"username": "alice", "email": "a@example.com", "password": "password123!"}),
            "Password must contain at least one uppercase letter"),
        (json!({"username": "alice", "email": "a@example.com", "password": "Password!!"}),
            "Password must contain at least one number"),
        (json!({"username": "alice", "email": "a@example.com", "password": "Password123"}),
            "Password must contain at least one special character"),
    ];

    for (body, message) in cases {
        let response = app.server.post("/user/register").json(&body).await;
        assert_error(&response, StatusCode::BAD_REQUEST, message);
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    register_and_login(&app, "alice", "alice@example.com").await;

    let response = app
        .server
        .post("/user/login")
        .json(&json!({"email": "alice@example.com", "password": "Password999!"}))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Incorrect email or password");

    let response = app
        .server
        .post("/user/login")
        .json(&json!({"email": "nobody@example.com", "password": TEST_PASSWORD}))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Incorrect email or password");
}

#[tokio::test]
async fn test_missing_and_bad_tokens() {
    let app = TestApp::new();

    let response = app.server.get("/board").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Token not found");

    let response = app.get("/board", "not.a.token").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Access denied, bad token");
}

#[tokio::test]
async fn test_is_admin_ignored_unless_allowed() {
    let app = TestApp::new();
    let response = app
        .server
        .post("/user/register")
        .json(&json!({
            "username": "mallory",
            "email": "mallory@example.com",
            "password": TEST_PASSWORD,
            "isAdmin": true,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let user = app
        .store()
        .find_user_by_email("mallory@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!user.is_admin);
}

#[tokio::test]
async fn test_admin_registration_when_allowed() {
    let config = test_config_builder()
        .allow_admin_registration(true)
        .build()
        .unwrap();
    let app = TestApp::with_config(config);

    let response = app
        .server
        .post("/user/register")
        .json(&json!({
            "username": "root",
            "email": "root@example.com",
            "password": TEST_PASSWORD,
            "isAdmin": true,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = app
        .server
        .post("/user/login")
        .json(&json!({"email": "root@example.com", "password": TEST_PASSWORD}))
        .await;
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    let response = app.get("/user/all", &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_users_requires_admin() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let admin = create_admin(&app).await;

    let response = app.get("/user/all", &alice.token).await;
    assert_error(&response, StatusCode::FORBIDDEN, "Access denied");

    let response = app.get("/user/all", &admin.token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_user() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;

    let response = app.put("/user", &alice.token).json(&json!({})).await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Either username or password must be provided",
    );

    let response = app
        .put("/user", &alice.token)
        .json(&json!({"username": "alicia"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["user"]["username"], "alicia");
}

#[tokio::test]
async fn test_only_admin_acts_on_other_users() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let admin = create_admin(&app).await;

    let response = app
        .put("/user", &alice.token)
        .json(&json!({"user_id": bob.id, "username": "hacked"}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Access denied");

    let response = app
        .delete("/user", &alice.token)
        .json(&json!({"user_id": bob.id}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Access denied");

    let response = app
        .put("/user", &admin.token)
        .json(&json!({"user_id": bob.id, "username": "robert"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["user"]["username"], "robert");
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let board = create_board(&app, &alice.token, "Roadmap").await;
    let column = create_column(&app, &alice.token, &id_of(&board), "Todo").await;
    create_card(&app, &alice.token, &id_of(&column), "Task").await;

    let response = app.delete("/user", &alice.token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "User deleted successfully");

    let response = app.get("/user", &alice.token).await;
    assert_error(&response, StatusCode::NOT_FOUND, "User not found");
    assert!(app.store().list_boards(alice.id).await.unwrap().is_empty());
}
