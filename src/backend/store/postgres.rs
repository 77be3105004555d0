/**
 * PostgreSQL Record Store
 *
 * sqlx queries against the schema in `migrations/`. Every rank-changing
 * operation runs in one transaction: the entity write and its shift set
 * either commit together or not at all. The `(parent, position)` unique
 * constraints are deferred to commit, so a shift set may pass through
 * intermediate duplicate ranks.
 */

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    to_position, CardPatch, NewCard, NewColumn, NewUser, StoreError, StoreResult, UserPatch,
    UserRecord,
};
use crate::backend::ordering::Scope;
use crate::shared::{Board, Card, Column, ShiftSet};

const USER_FIELDS: &str = "id, username, email, password_hash, is_admin, created_at, updated_at";
const BOARD_FIELDS: &str = "id, user_id, title, created_at, updated_at";
const COLUMN_FIELDS: &str = "id, board_id, title, position, created_at, updated_at";
const CARD_FIELDS: &str = "id, column_id, title, description, color, position, created_at, updated_at";

/// Record store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Sibling table a shift set is written to
#[derive(Clone, Copy)]
enum RankTable {
    Columns,
    Cards,
}

impl RankTable {
    fn update_sql(self) -> &'static str {
        match self {
            Self::Columns => "UPDATE columns SET position = $1, updated_at = $2 WHERE id = $3",
            Self::Cards => "UPDATE cards SET position = $1, updated_at = $2 WHERE id = $3",
        }
    }
}

/// Write every rank of `shift` inside `tx`
async fn apply_shift(
    tx: &mut Transaction<'_, Postgres>,
    table: RankTable,
    shift: &ShiftSet<Uuid>,
) -> StoreResult<()> {
    let now = Utc::now();
    for update in shift.iter() {
        let result = sqlx::query(table.update_sql())
            .bind(to_position(update.rank)?)
            .bind(now)
            .bind(update.id)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            // A sibling vanished between snapshot and write
            return Err(StoreError::Conflict(format!("sibling {} no longer exists", update.id)));
        }
    }
    Ok(())
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create_user(&self, new: NewUser) -> StoreResult<UserRecord> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, username, email, password_hash, is_admin, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {USER_FIELDS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.is_admin)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_FIELDS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_FIELDS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_FIELDS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET username = COALESCE($2, username), \
             password_hash = COALESCE($3, password_hash), updated_at = $4 \
             WHERE id = $1 RETURNING {USER_FIELDS}"
        ))
        .bind(id)
        .bind(patch.username)
        .bind(patch.password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        // boards, columns and cards go with the user through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create_board(&self, user_id: Uuid, title: &str) -> StoreResult<Board> {
        let now = Utc::now();
        let board = sqlx::query_as::<_, Board>(&format!(
            "INSERT INTO boards (id, user_id, title, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {BOARD_FIELDS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(board)
    }

    pub async fn find_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_FIELDS} FROM boards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(board)
    }

    pub async fn list_boards(&self, user_id: Uuid) -> StoreResult<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_FIELDS} FROM boards WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(boards)
    }

    pub async fn rename_board(&self, id: Uuid, title: &str) -> StoreResult<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "UPDATE boards SET title = $2, updated_at = $3 WHERE id = $1 RETURNING {BOARD_FIELDS}"
        ))
        .bind(id)
        .bind(title)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(board)
    }

    pub async fn delete_board(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_columns(&self, board_id: Uuid) -> StoreResult<Vec<Column>> {
        let columns = sqlx::query_as::<_, Column>(&format!(
            "SELECT {COLUMN_FIELDS} FROM columns WHERE board_id = $1 ORDER BY position, created_at"
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(columns)
    }

    pub async fn find_column(&self, id: Uuid) -> StoreResult<Option<Column>> {
        let column = sqlx::query_as::<_, Column>(&format!(
            "SELECT {COLUMN_FIELDS} FROM columns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(column)
    }

    pub async fn insert_column(&self, new: NewColumn, shift: &ShiftSet<Uuid>) -> StoreResult<Column> {
        let mut tx = self.pool.begin().await?;
        apply_shift(&mut tx, RankTable::Columns, shift).await?;

        let now = Utc::now();
        let column = sqlx::query_as::<_, Column>(&format!(
            "INSERT INTO columns (id, board_id, title, position, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMN_FIELDS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.board_id)
        .bind(&new.title)
        .bind(to_position(new.order)?)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(column)
    }

    pub async fn update_column(
        &self,
        id: Uuid,
        title: Option<String>,
        shift: &ShiftSet<Uuid>,
    ) -> StoreResult<Column> {
        let mut tx = self.pool.begin().await?;
        apply_shift(&mut tx, RankTable::Columns, shift).await?;

        let column = sqlx::query_as::<_, Column>(&format!(
            "UPDATE columns SET title = COALESCE($2, title), updated_at = $3 \
             WHERE id = $1 RETURNING {COLUMN_FIELDS}"
        ))
        .bind(id)
        .bind(title)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(column)
    }

    pub async fn delete_column(&self, id: Uuid, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        apply_shift(&mut tx, RankTable::Columns, shift).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_cards(&self, column_id: Uuid) -> StoreResult<Vec<Card>> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_FIELDS} FROM cards WHERE column_id = $1 ORDER BY position, created_at"
        ))
        .bind(column_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    pub async fn find_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_FIELDS} FROM cards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    pub async fn insert_card(&self, new: NewCard, shift: &ShiftSet<Uuid>) -> StoreResult<Card> {
        let mut tx = self.pool.begin().await?;
        apply_shift(&mut tx, RankTable::Cards, shift).await?;

        let now = Utc::now();
        let card = sqlx::query_as::<_, Card>(&format!(
            "INSERT INTO cards (id, column_id, title, description, color, position, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {CARD_FIELDS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.column_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.color)
        .bind(to_position(new.order)?)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }

    pub async fn update_card(&self, id: Uuid, patch: CardPatch, shift: &ShiftSet<Uuid>) -> StoreResult<Card> {
        let mut tx = self.pool.begin().await?;
        apply_shift(&mut tx, RankTable::Cards, shift).await?;

        let card = sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET title = COALESCE($2, title), \
             description = COALESCE($3, description), color = COALESCE($4, color), \
             updated_at = $5 WHERE id = $1 RETURNING {CARD_FIELDS}"
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.color)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }

    pub async fn move_card(
        &self,
        id: Uuid,
        column_id: Uuid,
        rank: usize,
        shift: &ShiftSet<Uuid>,
    ) -> StoreResult<Card> {
        let mut tx = self.pool.begin().await?;
        apply_shift(&mut tx, RankTable::Cards, shift).await?;

        let card = sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET column_id = $2, position = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {CARD_FIELDS}"
        ))
        .bind(id)
        .bind(column_id)
        .bind(to_position(rank)?)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }

    pub async fn delete_card(&self, id: Uuid, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        apply_shift(&mut tx, RankTable::Cards, shift).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn apply_ranks(&self, scope: Scope, shift: &ShiftSet<Uuid>) -> StoreResult<()> {
        let table = match scope {
            Scope::Board(_) => RankTable::Columns,
            Scope::Column(_) => RankTable::Cards,
        };
        let mut tx = self.pool.begin().await?;
        apply_shift(&mut tx, table, shift).await?;
        tx.commit().await?;
        Ok(())
    }
}
