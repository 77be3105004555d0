//! Column API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use taskboard::backend::ordering::Scope;
use taskboard::shared::ShiftSet;

use crate::assert_contains;
use crate::common::*;

#[tokio::test]
async fn test_append_assigns_dense_ranks() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, _) = board_with_columns(&app, &alice.token, &["A", "B", "C"]).await;

    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["A", "B", "C"]);
    assert_dense(&ranks);
}

#[tokio::test]
async fn test_insert_at_rank_shifts_followers() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, _) = board_with_columns(&app, &alice.token, &["A", "B"]).await;

    let response = app
        .post("/column", &alice.token)
        .json(&json!({"board_id": board_id, "title": "Front", "order": 0}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["order"], 0);

    // order == count appends
    let response = app
        .post("/column", &alice.token)
        .json(&json!({"board_id": board_id, "title": "Back", "order": 3}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["Front", "A", "B", "Back"]);
    assert_dense(&ranks);
}

#[tokio::test]
async fn test_insert_rejects_out_of_range_order() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, _) = board_with_columns(&app, &alice.token, &["A"]).await;

    for order in [-1, 2] {
        let response = app
            .post("/column", &alice.token)
            .json(&json!({"board_id": board_id, "title": "X", "order": order}))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_contains!(body["error"].as_str().unwrap(), "out of range");
    }

    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["A"]);
}

#[tokio::test]
async fn test_create_validation_and_access() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let board = create_board(&app, &alice.token, "Roadmap").await;

    let response = app
        .post("/column", &alice.token)
        .json(&json!({"board_id": id_of(&board)}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "board_id and title are required");

    let response = app
        .post("/column", &alice.token)
        .json(&json!({"board_id": "64b7f0c2e4b0a1a2b3c4d5e6", "title": "Todo"}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Board not found");

    let response = app
        .post("/column", &bob.token)
        .json(&json!({"board_id": id_of(&board), "title": "Todo"}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Access denied");

    let response = app
        .get("/column", &bob.token)
        .add_query_param("board_id", id_of(&board))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Access denied");

    let response = app.get("/column", &alice.token).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "board_id is required");
}

#[tokio::test]
async fn test_reposition_forward_and_backward() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, ids) = board_with_columns(&app, &alice.token, &["A", "B", "C", "D"]).await;

    let response = app
        .put("/column/modify", &alice.token)
        .json(&json!({"column_id": ids[0], "order": 3}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["order"], 3);
    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["B", "C", "D", "A"]);
    assert_dense(&ranks);

    let response = app
        .put("/column/modify", &alice.token)
        .json(&json!({"column_id": ids[3], "order": 0}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["D", "B", "C", "A"]);
    assert_dense(&ranks);
}

#[tokio::test]
async fn test_modify_title_and_rank_together() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, ids) = board_with_columns(&app, &alice.token, &["A", "B", "C"]).await;

    let response = app
        .put("/column/modify", &alice.token)
        .json(&json!({"column_id": ids[2], "title": "Urgent", "order": 0}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["Urgent", "A", "B"]);
}

#[tokio::test]
async fn test_modify_validation() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (_, ids) = board_with_columns(&app, &alice.token, &["A", "B"]).await;

    let response = app
        .put("/column/modify", &alice.token)
        .json(&json!({"column_id": ids[0]}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Nothing to modify");

    let response = app
        .put("/column/modify", &alice.token)
        .json(&json!({"title": "Renamed"}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "column_id is required");

    let response = app
        .put("/column/modify", &alice.token)
        .json(&json!({"column_id": Uuid::new_v4(), "title": "Renamed"}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Column not found");

    // The largest valid rank of a two-column board is 1
    let response = app
        .put("/column/modify", &alice.token)
        .json(&json!({"column_id": ids[0], "order": 2}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_compacts_board() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, ids) = board_with_columns(&app, &alice.token, &["A", "B", "C", "D"]).await;
    create_card(&app, &alice.token, &ids[1], "Task").await;

    let response = app
        .delete("/column", &alice.token)
        .json(&json!({"column_id": ids[1]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "Column and associated cards deleted successfully"
    );

    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["A", "C", "D"]);
    assert_dense(&ranks);
    assert!(app
        .store()
        .list_cards(ids[1].parse().unwrap())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_only_touches_its_board() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (first, first_ids) = board_with_columns(&app, &alice.token, &["A", "B"]).await;
    let (second, _) = board_with_columns(&app, &alice.token, &["X", "Y", "Z"]).await;

    app.delete("/column", &alice.token)
        .json(&json!({"column_id": first_ids[0]}))
        .await;

    assert_eq!(titles(&column_ranks(&app, &alice.token, &first).await), vec!["B"]);
    let other = column_ranks(&app, &alice.token, &second).await;
    assert_eq!(titles(&other), vec!["X", "Y", "Z"]);
    assert_dense(&other);
}

#[tokio::test]
async fn test_gapped_ranks_are_repaired() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, ids) = board_with_columns(&app, &alice.token, &["A", "B", "C"]).await;
    let board: Uuid = board_id.parse().unwrap();

    // Leave gaps the way an older writer could have
    let mut gaps: ShiftSet<Uuid> = ShiftSet::new();
    gaps.assign(ids[1].parse().unwrap(), 5);
    gaps.assign(ids[2].parse().unwrap(), 9);
    app.store().apply_ranks(Scope::Board(board), &gaps).await.unwrap();

    let response = app
        .post("/column", &alice.token)
        .json(&json!({"board_id": board_id, "title": "New", "order": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["A", "New", "B", "C"]);
    assert_dense(&ranks);
}

#[tokio::test]
async fn test_listing_repairs_gapped_ranks() {
    let app = TestApp::new();
    let alice = create_test_user(&app, "alice").await;
    let (board_id, ids) = board_with_columns(&app, &alice.token, &["A", "B"]).await;
    let board: Uuid = board_id.parse().unwrap();

    let mut gaps: ShiftSet<Uuid> = ShiftSet::new();
    gaps.assign(ids[0].parse().unwrap(), 3);
    gaps.assign(ids[1].parse().unwrap(), 7);
    app.store().apply_ranks(Scope::Board(board), &gaps).await.unwrap();

    let ranks = column_ranks(&app, &alice.token, &board_id).await;
    assert_eq!(titles(&ranks), vec!["A", "B"]);
    assert_dense(&ranks);

    let stored: Vec<i32> = app
        .store()
        .list_columns(board)
        .await
        .unwrap()
        .iter()
        .map(|c| c.order)
        .collect();
    assert_eq!(stored, vec![0, 1]);
}
