/**
 * Card Handlers
 *
 * - `GET /card?column_id=` - cards of a column sorted by rank
 * - `POST /card` - create a card, appended or inserted at `order`
 * - `PUT /card/modify` - edit and/or reposition a card
 * - `PUT /card/move` - move a card to the end of another column
 * - `DELETE /card` - delete a card
 *
 * Cards are ranked within their column. A move between columns holds both
 * column locks and writes both scopes in one transaction.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use uuid::Uuid;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::cards::types::{
    CreateCardRequest, CreatedCard, DeleteCardRequest, ListCardsQuery, ModifyCardRequest,
    MoveCardRequest,
};
use crate::backend::columns::owned_column;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, AuthenticatedUser, Params, Payload};
use crate::backend::ordering::{reconcile, Scope, ScopeLocks};
use crate::backend::store::{CardPatch, NewCard, RecordStore, StoreError};
use crate::shared::ordering::{
    append, checked_rank, insert_at, remove, reposition, transfer, OrderError,
};
use crate::shared::{Card, Column, ShiftSet};

fn card_not_found(card_id: Uuid) -> BackendError {
    tracing::warn!("Card not found: {}", card_id);
    BackendError::not_found("Card not found")
}

/// Error for a card that is missing from the locked column snapshot
///
/// The card was read before the lock was taken. If it still exists, a
/// concurrent move took it to another column and the request can be retried.
async fn missing_from_column(store: &RecordStore, card_id: Uuid, column_id: Uuid) -> BackendError {
    match store.find_card(card_id).await {
        Ok(Some(card)) => {
            tracing::warn!(
                "Card {} left column {} for column {} while waiting for the lock",
                card_id,
                column_id,
                card.column_id
            );
            StoreError::Conflict(format!("card {} changed column", card_id)).into()
        }
        Ok(None) => card_not_found(card_id),
        Err(err) => err.into(),
    }
}

/// Load a card with its column, checking access to the column's board
pub async fn owned_card(
    store: &RecordStore,
    auth: &AuthenticatedUser,
    card_id: Uuid,
) -> Result<(Card, Column), BackendError> {
    let card = store
        .find_card(card_id)
        .await?
        .ok_or_else(|| card_not_found(card_id))?;
    let column = owned_column(store, auth, card.column_id).await?;
    Ok((card, column))
}

pub async fn list_cards(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Params(query): Params<ListCardsQuery>,
) -> Result<Json<Vec<Card>>, BackendError> {
    let column_id = query.validate()?;
    owned_column(&store, &auth, column_id).await?;

    let scope = Scope::Column(column_id);
    let cards = store.list_cards(column_id).await?;
    if reconcile(scope, &cards).repair.is_empty() {
        return Ok(Json(cards));
    }

    let _guard = locks.lock(scope).await;
    let cards = store.list_cards(column_id).await?;
    let reconciled = reconcile(scope, &cards);
    if reconciled.repair.is_empty() {
        return Ok(Json(cards));
    }
    tracing::debug!(?scope, shift = ?reconciled.repair, "Repairing card ranks");
    store.apply_ranks(scope, &reconciled.repair).await?;
    Ok(Json(store.list_cards(column_id).await?))
}

pub async fn create_card(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<CreateCardRequest>,
) -> Result<(StatusCode, Json<CreatedCard>), BackendError> {
    let request = request.validate()?;
    owned_column(&store, &auth, request.column_id).await?;

    let scope = Scope::Column(request.column_id);
    let _guard = locks.lock(scope).await;

    let cards = store.list_cards(request.column_id).await?;
    let reconciled = reconcile(scope, &cards);
    let count = reconciled.siblings.len();

    let (rank, shift) = match request.order {
        Some(order) => {
            let rank = checked_rank(order, count)?;
            (rank, insert_at(&reconciled.siblings, rank)?)
        }
        None => (append(count), ShiftSet::new()),
    };
    let shift = reconciled.with(shift);
    tracing::debug!(?scope, rank, ?shift, "Inserting card");

    let card = store
        .insert_card(
            NewCard {
                column_id: request.column_id,
                title: request.title,
                description: request.description,
                color: request.color,
                order: rank,
            },
            &shift,
        )
        .await?;

    tracing::info!("Card {} created in column {} at rank {}", card.id, card.column_id, rank);
    Ok((
        StatusCode::CREATED,
        Json(CreatedCard {
            card,
            warning: request.warning.map(String::from),
        }),
    ))
}

pub async fn modify_card(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<ModifyCardRequest>,
) -> Result<Json<Card>, BackendError> {
    let change = request.validate()?;
    let (card, _) = owned_card(&store, &auth, change.card_id).await?;

    let patch = CardPatch {
        title: change.title,
        description: change.description,
        color: change.color,
    };

    let Some(order) = change.order else {
        let card = store.update_card(card.id, patch, &ShiftSet::new()).await?;
        tracing::info!("Card {} modified", card.id);
        return Ok(Json(card));
    };

    let scope = Scope::Column(card.column_id);
    let _guard = locks.lock(scope).await;

    let cards = store.list_cards(card.column_id).await?;
    let reconciled = reconcile(scope, &cards);
    if reconciled.rank_of(card.id).is_none() {
        return Err(missing_from_column(&store, card.id, card.column_id).await);
    }

    let target = checked_rank(order, reconciled.siblings.len() - 1)?;
    let shift = reconciled.with(reposition(&reconciled.siblings, &card.id, target)?);
    tracing::debug!(?scope, target, ?shift, "Repositioning card");

    let card = store.update_card(card.id, patch, &shift).await?;
    tracing::info!("Card {} modified", card.id);
    Ok(Json(card))
}

pub async fn move_card(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<MoveCardRequest>,
) -> Result<Json<Card>, BackendError> {
    let request = request.validate()?;
    let (card, old_column) = owned_card(&store, &auth, request.card_id).await?;

    let new_column = store
        .find_column(request.column_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("New column not found: {}", request.column_id);
            BackendError::not_found("New column not found")
        })?;
    if new_column.board_id != old_column.board_id {
        tracing::warn!(
            "Card {} cannot move from board {} to board {}",
            card.id,
            old_column.board_id,
            new_column.board_id
        );
        return Err(BackendError::bad_request(
            "You can only move cards within the same board",
        ));
    }

    if new_column.id == old_column.id {
        let scope = Scope::Column(old_column.id);
        let _guard = locks.lock(scope).await;

        let cards = store.list_cards(old_column.id).await?;
        let reconciled = reconcile(scope, &cards);
        if reconciled.rank_of(card.id).is_none() {
            return Err(missing_from_column(&store, card.id, old_column.id).await);
        }
        let last = reconciled.siblings.len() - 1;
        let shift = reconciled.with(reposition(&reconciled.siblings, &card.id, last)?);
        tracing::debug!(?scope, ?shift, "Moving card to the end of its column");

        let card = store.update_card(card.id, CardPatch::default(), &shift).await?;
        return Ok(Json(card));
    }

    let old_scope = Scope::Column(old_column.id);
    let new_scope = Scope::Column(new_column.id);
    let _guard = locks.lock_pair(old_scope, new_scope).await;

    let old_reconciled = reconcile(old_scope, &store.list_cards(old_column.id).await?);
    let new_reconciled = reconcile(new_scope, &store.list_cards(new_column.id).await?);

    let moved = match transfer(&old_reconciled.siblings, new_reconciled.siblings.len(), &card.id) {
        Ok(moved) => moved,
        Err(OrderError::NotFound) => {
            return Err(missing_from_column(&store, card.id, old_column.id).await)
        }
        Err(err) => return Err(err.into()),
    };

    let shift = old_reconciled
        .with(moved.old_scope)
        .without(&card.id)
        .then(new_reconciled.repair.clone());
    tracing::debug!(?old_scope, ?new_scope, rank = moved.new_rank, ?shift, "Transferring card");

    let card = store
        .move_card(card.id, new_column.id, moved.new_rank, &shift)
        .await?;
    tracing::info!("Card {} moved to column {}", card.id, new_column.id);
    Ok(Json(card))
}

pub async fn delete_card(
    State(store): State<RecordStore>,
    State(locks): State<ScopeLocks>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<DeleteCardRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let card_id = request.validate()?;
    let (card, _) = owned_card(&store, &auth, card_id).await?;

    let scope = Scope::Column(card.column_id);
    let _guard = locks.lock(scope).await;

    let reconciled = reconcile(scope, &store.list_cards(card.column_id).await?);
    let Some(rank) = reconciled.rank_of(card.id) else {
        return Err(missing_from_column(&store, card.id, card.column_id).await);
    };

    let shift = reconciled
        .with(remove(&reconciled.siblings, rank))
        .without(&card.id);
    tracing::debug!(?scope, rank, ?shift, "Removing card");

    store.delete_card(card.id, &shift).await?;
    tracing::info!("Card {} deleted by {}", card.id, auth.user_id);
    Ok(Json(MessageResponse::new("Card deleted successfully")))
}
