//! PostgreSQL record store tests
//!
//! Need a disposable database in `DATABASE_URL`:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/taskboard_test cargo test -- --ignored
//! ```

use assert_matches::assert_matches;
use serial_test::serial;
use uuid::Uuid;

use taskboard::backend::server::config::load_store;
use taskboard::backend::store::{NewColumn, NewUser, RecordStore, StoreError};
use taskboard::shared::board::snapshot;
use taskboard::shared::ordering::{remove, reposition};
use taskboard::shared::{ServerConfig, ShiftSet};

async fn postgres_store() -> RecordStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");
    let config = ServerConfig::builder().database_url(url).build().unwrap();
    let store = load_store(&config).await.expect("connect and migrate");
    assert_eq!(store.backend_name(), "postgres");
    store
}

async fn seeded_board(store: &RecordStore) -> Uuid {
    let user = store
        .create_user(NewUser {
            username: "pg-user".to_string(),
            email: format!("pg_{}@example.com", Uuid::new_v4().simple()),
            password_hash: "hash".to_string(),
            is_admin: false,
        })
        .await
        .unwrap();
    store.create_board(user.id, "Board").await.unwrap().id
}

async fn append_column(store: &RecordStore, board_id: Uuid, title: &str) -> Uuid {
    let count = store.list_columns(board_id).await.unwrap().len();
    store
        .insert_column(
            NewColumn {
                board_id,
                title: title.to_string(),
                order: count,
            },
            &ShiftSet::new(),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_reposition_and_delete_commit_atomically() {
    let store = postgres_store().await;
    let board_id = seeded_board(&store).await;
    let a = append_column(&store, board_id, "A").await;
    let b = append_column(&store, board_id, "B").await;
    let c = append_column(&store, board_id, "C").await;

    let columns = store.list_columns(board_id).await.unwrap();
    let shift = reposition(&snapshot(&columns), &a, 2).unwrap();
    store.update_column(a, None, &shift).await.unwrap();

    let ids: Vec<Uuid> = store
        .list_columns(board_id)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![b, c, a]);

    let columns = store.list_columns(board_id).await.unwrap();
    let shift = remove(&snapshot(&columns), 0);
    store.delete_column(b, &shift).await.unwrap();
    let orders: Vec<i32> = store
        .list_columns(board_id)
        .await
        .unwrap()
        .iter()
        .map(|c| c.order)
        .collect();
    assert_eq!(orders, vec![0, 1]);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_duplicate_rank_is_a_conflict() {
    let store = postgres_store().await;
    let board_id = seeded_board(&store).await;
    append_column(&store, board_id, "A").await;

    let err = store
        .insert_column(
            NewColumn {
                board_id,
                title: "B".to_string(),
                order: 0,
            },
            &ShiftSet::new(),
        )
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Conflict(_));
    assert_eq!(store.list_columns(board_id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_duplicate_email_is_a_conflict() {
    let store = postgres_store().await;
    let email = format!("dup_{}@example.com", Uuid::new_v4().simple());
    let new_user = || NewUser {
        username: "dup".to_string(),
        email: email.clone(),
        password_hash: "hash".to_string(),
        is_admin: false,
    };
    store.create_user(new_user()).await.unwrap();
    assert_matches!(store.create_user(new_user()).await, Err(StoreError::Conflict(_)));
}
