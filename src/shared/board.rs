//! Board Data Types
//!
//! Records exposed by the API: boards, their columns and the cards inside
//! each column, plus the public view of a user account. Columns and cards are
//! the two orderable entity families; both implement [`Ranked`] so the
//! ordering functions can work on snapshots of either.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::ordering::Sibling;

/// User account as returned to clients (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A board owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A column of a board, ranked among the board's columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    #[cfg_attr(feature = "server", sqlx(rename = "position"))]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A card of a column, ranked among the column's cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub description: String,
    pub color: String,
    #[cfg_attr(feature = "server", sqlx(rename = "position"))]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An entity that holds a rank within a parent scope
pub trait Ranked {
    fn id(&self) -> Uuid;
    fn parent_id(&self) -> Uuid;
    fn order(&self) -> i32;

    /// The entity as seen by the ordering functions
    ///
    /// A negative stored order cannot be a valid rank; it maps to a rank no
    /// dense scope contains so the scope gets compacted.
    fn sibling(&self) -> Sibling<Uuid> {
        Sibling::new(self.id(), usize::try_from(self.order()).unwrap_or(usize::MAX))
    }
}

impl Ranked for Column {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Uuid {
        self.board_id
    }

    fn order(&self) -> i32 {
        self.order
    }
}

impl Ranked for Card {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Uuid {
        self.column_id
    }

    fn order(&self) -> i32 {
        self.order
    }
}

/// Snapshot a sibling scope for the ordering functions
pub fn snapshot<T: Ranked>(items: &[T]) -> Vec<Sibling<Uuid>> {
    items.iter().map(Ranked::sibling).collect()
}
