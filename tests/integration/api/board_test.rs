//! Board API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::*;

#[tokio::test]
async fn test_create_and_list_own_boards() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;

    let board = create_board(&app, &alice.token, "  Roadmap ").await;
    assert_eq!(board["title"], "Roadmap");
    assert_eq!(board["userId"], alice.id.to_string());

    let response = app.get("/board", &alice.token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let boards: Vec<Value> = response.json();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0]["id"], board["id"]);
}

#[tokio::test]
async fn test_create_requires_title() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;

    let response = app.post("/board", &alice.token).json(&json!({"title": " "})).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Title is required");
}

#[tokio::test]
async fn test_create_for_deleted_user() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    app.store().delete_user(alice.id).await.unwrap();

    let response = app.post("/board", &alice.token).json(&json!({"title": "Ghost"})).await;
    assert_error(&response, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_list_by_email() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let admin = create_admin(&app).await;
    create_board(&app, &bob.token, "Bob's board").await;

    let response = app
        .get("/board", &alice.token)
        .add_query_param("email", &bob.email)
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Access denied");

    let response = app
        .get("/board", &admin.token)
        .add_query_param("email", &bob.email)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let boards: Vec<Value> = response.json();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0]["title"], "Bob's board");

    let response = app
        .get("/board", &admin.token)
        .add_query_param("email", "nobody@example.com")
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_rename_board() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let board = create_board(&app, &alice.token, "Roadmap").await;

    let response = app
        .put("/board", &alice.token)
        .json(&json!({"board_id": id_of(&board)}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "board_id and title are required");

    let response = app
        .put("/board", &bob.token)
        .json(&json!({"board_id": id_of(&board), "title": "Mine now"}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Access denied");

    let response = app
        .put("/board", &alice.token)
        .json(&json!({"board_id": Uuid::new_v4(), "title": "Nope"}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Board not found");

    let response = app
        .put("/board", &alice.token)
        .json(&json!({"board_id": id_of(&board), "title": "Roadmap 2"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["title"], "Roadmap 2");
}

#[tokio::test]
async fn test_delete_board_cascades() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, column_ids) = board_with_columns(&app, &alice.token, &["Todo", "Done"]).await;
    create_card(&app, &alice.token, &column_ids[0], "Task").await;

    let response = app.delete("/board", &alice.token).json(&json!({})).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "board_id is required");

    let response = app
        .delete("/board", &alice.token)
        .json(&json!({"board_id": board_id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "Board and associated columns and cards deleted successfully"
    );

    for column_id in &column_ids {
        let id = column_id.parse().unwrap();
        assert!(app.store().find_column(id).await.unwrap().is_none());
        assert!(app.store().list_cards(id).await.unwrap().is_empty());
    }

    let response = app
        .get("/column", &alice.token)
        .add_query_param("board_id", &board_id)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Board not found");
}

#[tokio::test]
async fn test_admin_can_act_on_any_board() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let admin = create_admin(&app).await;
    let board = create_board(&app, &alice.token, "Roadmap").await;

    let response = app
        .delete("/board", &admin.token)
        .json(&json!({"board_id": id_of(&board)}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
