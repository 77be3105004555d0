//! Record Store
//!
//! Persistence for users, boards, columns and cards. Two backends share one
//! set of operations:
//!
//! - **`postgres`** - PostgreSQL through a `sqlx::PgPool`
//! - **`memory`** - process-local tables, used when `DATABASE_URL` is unset
//!   and by the tests
//!
//! # Rank Writes
//!
//! Every operation that changes ranks takes the [`ShiftSet`] computed by the
//! ordering functions and persists it together with the entity change in a
//! single transaction. Either the whole batch lands or none of it does.
//! Both backends reject a write that would leave two siblings with the same
//! rank with [`StoreError::Conflict`].

/// PostgreSQL backend
pub mod postgres;

/// In-memory backend
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::ordering::Scope;
use crate::shared::{Board, Card, Column, ShiftSet, UserProfile};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record addressed by the write does not exist
    #[error("record not found")]
    NotFound,

    /// A uniqueness rule (email, sibling rank) would be violated
    #[error("conflicting write: {0}")]
    Conflict(String),

    /// A rank too large for the storage column
    #[error("rank {0} cannot be stored")]
    RankOverflow(usize),

    /// Any other database failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Stored user account, including the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Public view of the account
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewColumn {
    pub board_id: Uuid,
    pub title: String,
    pub order: usize,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub column_id: Uuid,
    pub title: String,
    pub description: String,
    pub color: String,
    pub order: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Convert a rank to the stored integer
pub(crate) fn to_position(rank: usize) -> StoreResult<i32> {
    i32::try_from(rank).map_err(|_| StoreError::RankOverflow(rank))
}

/// The configured record store
#[derive(Clone)]
pub enum RecordStore {
    Postgres(PgStore),
    Memory(MemoryStore),
}

macro_rules! dispatch {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self {
            RecordStore::Postgres(store) => store.$method($($arg),*).await,
            RecordStore::Memory(store) => store.$method($($arg),*).await,
        }
    };
}

impl RecordStore {
    /// Fresh in-memory store
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    // Users

    pub async fn create_user(&self, new: NewUser) -> StoreResult<UserRecord> {
        dispatch!(self.create_user(new))
    }

    pub async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        dispatch!(self.find_user(id))
    }

    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        dispatch!(self.find_user_by_email(email))
    }

    pub async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        dispatch!(self.list_users())
    }

    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<UserRecord>> {
        dispatch!(self.update_user(id, patch))
    }

    /// Delete a user with their boards, columns and cards
    pub async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        dispatch!(self.delete_user(id))
    }

    // Boards

    pub async fn create_board(&self, user_id: Uuid, title: &str) -> StoreResult<Board> {
        dispatch!(self.create_board(user_id, title))
    }

    pub async fn find_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        dispatch!(self.find_board(id))
    }

    pub async fn list_boards(&self, user_id: Uuid) -> StoreResult<Vec<Board>> {
        dispatch!(self.list_boards(user_id))
    }

    pub async fn rename_board(&self, id: Uuid, title: &str) -> StoreResult<Option<Board>> {
        dispatch!(self.rename_board(id, title))
    }

    /// Delete a board with its columns and cards
    pub async fn delete_board(&self, id: Uuid) -> StoreResult<bool> {
        dispatch!(self.delete_board(id))
    }

    // Columns

    /// Columns of a board sorted by rank
    pub async fn list_columns(&self, board_id: Uuid) -> StoreResult<Vec<Column>> {
        dispatch!(self.list_columns(board_id))
    }

    pub async fn find_column(&self, id: Uuid) -> StoreResult<Option<Column>> {
        dispatch!(self.find_column(id))
    }

    pub async fn insert_column(&self, new: NewColumn, shift: &ShiftSet<Uuid>) -> StoreResult<Column> {
        dispatch!(self.insert_column(new, shift))
    }

    pub async fn update_column(
        &self,
        id: Uuid,
        title: Option<String>,
        shift: &ShiftSet<Uuid>,
    ) -> StoreResult<Column> {
        dispatch!(self.update_column(id, title, shift))
    }

    /// Delete a column with its cards and compact the board's columns
    pub async fn delete_column(&self, id: Uuid, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        dispatch!(self.delete_column(id, shift))
    }

    // Cards

    /// Cards of a column sorted by rank
    pub async fn list_cards(&self, column_id: Uuid) -> StoreResult<Vec<Card>> {
        dispatch!(self.list_cards(column_id))
    }

    pub async fn find_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
        dispatch!(self.find_card(id))
    }

    pub async fn insert_card(&self, new: NewCard, shift: &ShiftSet<Uuid>) -> StoreResult<Card> {
        dispatch!(self.insert_card(new, shift))
    }

    pub async fn update_card(&self, id: Uuid, patch: CardPatch, shift: &ShiftSet<Uuid>) -> StoreResult<Card> {
        dispatch!(self.update_card(id, patch, shift))
    }

    /// Re-parent a card at `rank`
    ///
    /// `shift` may hold rank writes for both the old and the new column.
    pub async fn move_card(
        &self,
        id: Uuid,
        column_id: Uuid,
        rank: usize,
        shift: &ShiftSet<Uuid>,
    ) -> StoreResult<Card> {
        dispatch!(self.move_card(id, column_id, rank, shift))
    }

    pub async fn delete_card(&self, id: Uuid, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        dispatch!(self.delete_card(id, shift))
    }

    /// Write a shift set to one scope without any other change
    pub async fn apply_ranks(&self, scope: Scope, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        dispatch!(self.apply_ranks(scope, shift))
    }
}
