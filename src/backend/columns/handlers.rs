/**
 * Column Handlers
 *
 * - `GET /column?board_id=` - columns of a board sorted by rank
 * - `POST /column` - create a column, appended or inserted at `order`
 * - `PUT /column/modify` - rename and/or reposition a column
 * - `DELETE /column` - delete a column with its cards
 *
 * Columns are ranked within their board. Every rank change runs under the
 * board's scope lock: re-read the board's columns, reconcile them, compute
 * the shift set, write it together with the column change.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use uuid::Uuid;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::boards::owned_board;
use crate::backend::columns::types::{
    CreateColumnRequest, DeleteColumnRequest, ListColumnsQuery, ModifyColumnRequest,
};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, AuthenticatedUser, Params, Payload};
use crate::backend::ordering::{reconcile, Scope, ScopeLocks};
use crate::backend::store::{NewColumn, RecordStore};
use crate::shared::ordering::{append, checked_rank, insert_at, remove, reposition};
use crate::shared::{Column, ShiftSet};

/// Load a column whose board the requester may act on
pub async fn owned_column(
    store: &RecordStore,
    auth: &AuthenticatedUser,
    column_id: Uuid,
) -> Result<Column, BackendError> {
    let column = store.find_column(column_id).await?.ok_or_else(|| {
        tracing::warn!("Column not found: {}", column_id);
        BackendError::not_found("Column not found")
    })?;
    owned_board(store, auth, column.board_id).await?;
    Ok(column)
}

/// Columns of a board, compacting the board's ranks first if they are not dense
async fn dense_columns(
    store: &RecordStore,
    locks: &ScopeLocks,
    board_id: Uuid,
) -> Result<Vec<Column>, BackendError> {
    let scope = Scope::Board(board_id);
    let columns = store.list_columns(board_id).await?;
    if reconcile(scope, &columns).repair.is_empty() {
        return Ok(columns);
    }

    let _guard = locks.lock(scope).await;
    let columns = store.list_columns(board_id).await?;
    let reconciled = reconcile(scope, &columns);
    if reconciled.repair.is_empty() {
        return Ok(columns);
    }
    tracing::debug!(?scope, shift = ?reconciled.repair, "Repairing column ranks");
    store.apply_ranks(scope, &reconciled.repair).await?;
    Ok(store.list_columns(board_id).await?)
}

pub async fn list_columns(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Params(query): Params<ListColumnsQuery>,
) -> Result<Json<Vec<Column>>, BackendError> {
    let board_id = query.validate()?;
    owned_board(&store, &auth, board_id).await?;

    let columns = dense_columns(&store, &locks, board_id).await?;
    Ok(Json(columns))
}

pub async fn create_column(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<CreateColumnRequest>,
) -> Result<(StatusCode, Json<Column>), BackendError> {
    let request = request.validate()?;
    owned_board(&store, &auth, request.board_id).await?;

    let scope = Scope::Board(request.board_id);
    let _guard = locks.lock(scope).await;

    let columns = store.list_columns(request.board_id).await?;
    let reconciled = reconcile(scope, &columns);
    let count = reconciled.siblings.len();

    let (rank, shift) = match request.order {
        Some(order) => {
            let rank = checked_rank(order, count)?;
            (rank, insert_at(&reconciled.siblings, rank)?)
        }
        None => (append(count), ShiftSet::new()),
    };
    let shift = reconciled.with(shift);
    tracing::debug!(?scope, rank, ?shift, "Inserting column");

    let column = store
        .insert_column(
            NewColumn {
                board_id: request.board_id,
                title: request.title,
                order: rank,
            },
            &shift,
        )
        .await?;

    tracing::info!("Column {} created on board {} at rank {}", column.id, column.board_id, rank);
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn modify_column(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<ModifyColumnRequest>,
) -> Result<Json<Column>, BackendError> {
    let change = request.validate()?;
    let column = owned_column(&store, &auth, change.column_id).await?;

    let Some(order) = change.order else {
        let column = store
            .update_column(column.id, change.title, &ShiftSet::new())
            .await?;
        tracing::info!("Column {} renamed", column.id);
        return Ok(Json(column));
    };

    let scope = Scope::Board(column.board_id);
    let _guard = locks.lock(scope).await;

    let columns = store.list_columns(column.board_id).await?;
    let reconciled = reconcile(scope, &columns);
    if reconciled.rank_of(column.id).is_none() {
        tracing::warn!("Column {} vanished from board {}", column.id, column.board_id);
        return Err(BackendError::not_found("Column not found"));
    }

    let target = checked_rank(order, reconciled.siblings.len() - 1)?;
    let shift = reconciled.with(reposition(&reconciled.siblings, &column.id, target)?);
    tracing::debug!(?scope, target, ?shift, "Repositioning column");

    let column = store.update_column(column.id, change.title, &shift).await?;
    tracing::info!("Column {} modified", column.id);
    Ok(Json(column))
}

pub async fn delete_column(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<DeleteColumnRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let column_id = request.validate()?;
    let column = owned_column(&store, &auth, column_id).await?;

    let scope = Scope::Board(column.board_id);
    let _guard = locks
        .lock_pair(scope, Scope::Column(column.id))
        .await;

    let columns = store.list_columns(column.board_id).await?;
    let reconciled = reconcile(scope, &columns);
    let rank = reconciled
        .rank_of(column.id)
        .ok_or_else(|| BackendError::not_found("Column not found"))?;

    let shift = reconciled
        .with(remove(&reconciled.siblings, rank))
        .without(&column.id);
    tracing::debug!(?scope, rank, ?shift, "Removing column");

    store.delete_column(column.id, &shift).await?;
    tracing::info!("Column {} deleted by {}", column.id, auth.user_id);
    Ok(Json(MessageResponse::new(
        "Column and associated cards deleted successfully",
    )))
}
