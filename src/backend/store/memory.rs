//! In-memory record store
//!
//! All tables live behind one `tokio::sync::RwLock`. Every mutation holds the
//! write lock for its whole duration, so a shift set and the entity change it
//! belongs to are applied together. Before committing, the resulting sibling
//! scope is checked for duplicate ranks, mirroring the unique constraint of
//! the PostgreSQL schema.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    to_position, CardPatch, NewCard, NewColumn, NewUser, StoreError, StoreResult, UserPatch,
    UserRecord,
};
use crate::backend::ordering::Scope;
use crate::shared::{Board, Card, Column, Ranked, ShiftSet};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    boards: HashMap<Uuid, Board>,
    columns: HashMap<Uuid, Column>,
    cards: HashMap<Uuid, Card>,
}

impl Tables {
    fn columns_of(&self, board_id: Uuid) -> Vec<Column> {
        sorted(self.columns.values().filter(|c| c.board_id == board_id).cloned())
    }

    fn cards_of(&self, column_id: Uuid) -> Vec<Card> {
        sorted(self.cards.values().filter(|c| c.column_id == column_id).cloned())
    }

    fn remove_column_cascade(&mut self, column_id: Uuid) {
        self.cards.retain(|_, card| card.column_id != column_id);
        self.columns.remove(&column_id);
    }

    fn remove_board_cascade(&mut self, board_id: Uuid) -> bool {
        let column_ids: Vec<Uuid> = self
            .columns
            .values()
            .filter(|c| c.board_id == board_id)
            .map(|c| c.id)
            .collect();
        for column_id in column_ids {
            self.remove_column_cascade(column_id);
        }
        self.boards.remove(&board_id).is_some()
    }
}

/// Sort by rank as the ordering functions see it, so an invalid stored order
/// lists where compaction will put it
fn sorted<T: Ranked + HasCreated>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| (item.sibling().rank, item.created()));
    items
}

trait HasCreated {
    fn created(&self) -> chrono::DateTime<Utc>;
}

impl HasCreated for Column {
    fn created(&self) -> chrono::DateTime<Utc> {
        self.created_at
    }
}

impl HasCreated for Card {
    fn created(&self) -> chrono::DateTime<Utc> {
        self.created_at
    }
}

/// Apply `shift` to a scope snapshot and check that no rank repeats
fn shifted<T: Ranked + Clone>(
    scope: Vec<T>,
    shift: &ShiftSet<Uuid>,
    set_order: fn(&mut T, i32),
) -> StoreResult<Vec<T>> {
    let mut scope = scope;
    for item in scope.iter_mut() {
        if let Some(rank) = shift.rank_of(&item.id()) {
            set_order(item, to_position(rank)?);
        }
    }
    let mut seen = HashSet::new();
    for item in &scope {
        if !seen.insert(item.order()) {
            return Err(StoreError::Conflict(format!(
                "rank {} is used twice in scope {}",
                item.order(),
                item.parent_id()
            )));
        }
    }
    Ok(scope)
}

fn set_column_order(column: &mut Column, order: i32) {
    column.order = order;
}

fn set_card_order(card: &mut Card, order: i32) {
    card.order = order;
}

/// Process-local record store
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_user(&self, new: NewUser) -> StoreResult<UserRecord> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict(format!("email {} already exists", new.email)));
        }
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            is_admin: new.is_admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    pub async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let tables = self.tables.read().await;
        let mut users: Vec<UserRecord> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<UserRecord>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    pub async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let board_ids: Vec<Uuid> = tables
            .boards
            .values()
            .filter(|b| b.user_id == id)
            .map(|b| b.id)
            .collect();
        for board_id in board_ids {
            tables.remove_board_cascade(board_id);
        }
        Ok(true)
    }

    pub async fn create_board(&self, user_id: Uuid, title: &str) -> StoreResult<Board> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }
        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.boards.insert(board.id, board.clone());
        Ok(board)
    }

    pub async fn find_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        Ok(self.tables.read().await.boards.get(&id).cloned())
    }

    pub async fn list_boards(&self, user_id: Uuid) -> StoreResult<Vec<Board>> {
        let tables = self.tables.read().await;
        let mut boards: Vec<Board> = tables
            .boards
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        boards.sort_by_key(|b| b.created_at);
        Ok(boards)
    }

    pub async fn rename_board(&self, id: Uuid, title: &str) -> StoreResult<Option<Board>> {
        let mut tables = self.tables.write().await;
        Ok(tables.boards.get_mut(&id).map(|board| {
            board.title = title.to_string();
            board.updated_at = Utc::now();
            board.clone()
        }))
    }

    pub async fn delete_board(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_board_cascade(id))
    }

    pub async fn list_columns(&self, board_id: Uuid) -> StoreResult<Vec<Column>> {
        Ok(self.tables.read().await.columns_of(board_id))
    }

    pub async fn find_column(&self, id: Uuid) -> StoreResult<Option<Column>> {
        Ok(self.tables.read().await.columns.get(&id).cloned())
    }

    pub async fn insert_column(&self, new: NewColumn, shift: &ShiftSet<Uuid>) -> StoreResult<Column> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&new.board_id) {
            return Err(StoreError::NotFound);
        }
        let now = Utc::now();
        let column = Column {
            id: Uuid::new_v4(),
            board_id: new.board_id,
            title: new.title,
            order: to_position(new.order)?,
            created_at: now,
            updated_at: now,
        };

        let mut scope = tables.columns_of(new.board_id);
        scope.push(column.clone());
        for item in shifted(scope, shift, set_column_order)? {
            tables.columns.insert(item.id, item);
        }
        Ok(column)
    }

    pub async fn update_column(
        &self,
        id: Uuid,
        title: Option<String>,
        shift: &ShiftSet<Uuid>,
    ) -> StoreResult<Column> {
        let mut tables = self.tables.write().await;
        let board_id = tables.columns.get(&id).ok_or(StoreError::NotFound)?.board_id;

        let now = Utc::now();
        let mut scope = tables.columns_of(board_id);
        for item in scope.iter_mut() {
            if item.id == id {
                if let Some(title) = &title {
                    item.title = title.clone();
                }
                item.updated_at = now;
            }
        }
        for item in shifted(scope, shift, set_column_order)? {
            tables.columns.insert(item.id, item);
        }
        tables.columns.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    pub async fn delete_column(&self, id: Uuid, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let board_id = tables.columns.get(&id).ok_or(StoreError::NotFound)?.board_id;

        let scope: Vec<Column> = tables
            .columns_of(board_id)
            .into_iter()
            .filter(|c| c.id != id)
            .collect();
        let scope = shifted(scope, shift, set_column_order)?;

        tables.remove_column_cascade(id);
        for item in scope {
            tables.columns.insert(item.id, item);
        }
        Ok(())
    }

    pub async fn list_cards(&self, column_id: Uuid) -> StoreResult<Vec<Card>> {
        Ok(self.tables.read().await.cards_of(column_id))
    }

    pub async fn find_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
        Ok(self.tables.read().await.cards.get(&id).cloned())
    }

    pub async fn insert_card(&self, new: NewCard, shift: &ShiftSet<Uuid>) -> StoreResult<Card> {
        let mut tables = self.tables.write().await;
        if !tables.columns.contains_key(&new.column_id) {
            return Err(StoreError::NotFound);
        }
        let now = Utc::now();
        let card = Card {
            id: Uuid::new_v4(),
            column_id: new.column_id,
            title: new.title,
            description: new.description,
            color: new.color,
            order: to_position(new.order)?,
            created_at: now,
            updated_at: now,
        };

        let mut scope = tables.cards_of(new.column_id);
        scope.push(card.clone());
        for item in shifted(scope, shift, set_card_order)? {
            tables.cards.insert(item.id, item);
        }
        Ok(card)
    }

    pub async fn update_card(&self, id: Uuid, patch: CardPatch, shift: &ShiftSet<Uuid>) -> StoreResult<Card> {
        let mut tables = self.tables.write().await;
        let column_id = tables.cards.get(&id).ok_or(StoreError::NotFound)?.column_id;

        let now = Utc::now();
        let mut scope = tables.cards_of(column_id);
        for item in scope.iter_mut().filter(|c| c.id == id) {
            if let Some(title) = &patch.title {
                item.title = title.clone();
            }
            if let Some(description) = &patch.description {
                item.description = description.clone();
            }
            if let Some(color) = &patch.color {
                item.color = color.clone();
            }
            item.updated_at = now;
        }
        for item in shifted(scope, shift, set_card_order)? {
            tables.cards.insert(item.id, item);
        }
        tables.cards.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    pub async fn move_card(
        &self,
        id: Uuid,
        column_id: Uuid,
        rank: usize,
        shift: &ShiftSet<Uuid>,
    ) -> StoreResult<Card> {
        let mut tables = self.tables.write().await;
        let mut card = tables.cards.get(&id).cloned().ok_or(StoreError::NotFound)?;
        if !tables.columns.contains_key(&column_id) {
            return Err(StoreError::NotFound);
        }

        let old_scope: Vec<Card> = tables
            .cards_of(card.column_id)
            .into_iter()
            .filter(|c| c.id != id)
            .collect();
        let old_scope = shifted(old_scope, shift, set_card_order)?;

        card.column_id = column_id;
        card.order = to_position(rank)?;
        card.updated_at = Utc::now();
        let mut new_scope = tables.cards_of(column_id);
        new_scope.push(card.clone());
        let new_scope = shifted(new_scope, shift, set_card_order)?;

        for item in old_scope.into_iter().chain(new_scope) {
            tables.cards.insert(item.id, item);
        }
        Ok(card)
    }

    pub async fn delete_card(&self, id: Uuid, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let column_id = tables.cards.get(&id).ok_or(StoreError::NotFound)?.column_id;

        let scope: Vec<Card> = tables
            .cards_of(column_id)
            .into_iter()
            .filter(|c| c.id != id)
            .collect();
        let scope = shifted(scope, shift, set_card_order)?;

        tables.cards.remove(&id);
        for item in scope {
            tables.cards.insert(item.id, item);
        }
        Ok(())
    }

    pub async fn apply_ranks(&self, scope: Scope, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match scope {
            Scope::Board(board_id) => {
                let columns = tables.columns_of(board_id);
                for item in shifted(columns, shift, set_column_order)? {
                    tables.columns.insert(item.id, item);
                }
            }
            Scope::Column(column_id) => {
                let cards = tables.cards_of(column_id);
                for item in shifted(cards, shift, set_card_order)? {
                    tables.cards.insert(item.id, item);
                }
            }
        }
        Ok(())
    }
}
