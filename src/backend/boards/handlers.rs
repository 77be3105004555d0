/**
 * Board Handlers
 *
 * - `GET /board` - boards of the requester, or of `?email=` for admins
 * - `POST /board` - create a board owned by the requester
 * - `PUT /board` - rename a board
 * - `DELETE /board` - delete a board with its columns and cards
 *
 * Boards are not ranked, so none of these take a scope lock. Deleting a
 * board removes whole column and card scopes at once.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use uuid::Uuid;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::users::load_user;
use crate::backend::boards::types::{
    CreateBoardRequest, DeleteBoardRequest, ListBoardsQuery, UpdateBoardRequest,
};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, AuthenticatedUser, Params, Payload};
use crate::backend::store::RecordStore;
use crate::shared::Board;

/// Load a board the requester may act on
///
/// 404 "Board not found" when it does not exist, 403 when it belongs to
/// someone else and the requester is not an admin.
pub async fn owned_board(
    store: &RecordStore,
    auth: &AuthenticatedUser,
    board_id: Uuid,
) -> Result<Board, BackendError> {
    let board = store.find_board(board_id).await?.ok_or_else(|| {
        tracing::warn!("Board not found: {}", board_id);
        BackendError::not_found("Board not found")
    })?;
    auth.require_access(board.user_id)?;
    Ok(board)
}

pub async fn list_boards(
    State(store): State<RecordStore>,
    AuthUser(auth): AuthUser,
    Params(query): Params<ListBoardsQuery>,
) -> Result<Json<Vec<Board>>, BackendError> {
    let email = query
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());

    let owner_id = match email {
        None => auth.user_id,
        Some(email) => {
            if !auth.is_admin && email != auth.email {
                tracing::warn!("User {} asked for boards of {}", auth.user_id, email);
                return Err(BackendError::forbidden());
            }
            let user = store.find_user_by_email(&email).await?.ok_or_else(|| {
                tracing::warn!("User not found: {}", email);
                BackendError::not_found("User not found")
            })?;
            user.id
        }
    };

    let boards = store.list_boards(owner_id).await?;
    tracing::debug!("Found {} boards for user {}", boards.len(), owner_id);
    Ok(Json(boards))
}

pub async fn create_board(
    State(store): State<RecordStore>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>), BackendError> {
    let title = request.validate()?;
    let user = load_user(&store, auth.user_id).await?;

    let board = store.create_board(user.id, &title).await?;
    tracing::info!("Board {} created by {}", board.id, user.id);
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn update_board(
    State(store): State<RecordStore>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<UpdateBoardRequest>,
) -> Result<Json<Board>, BackendError> {
    let rename = request.validate()?;
    owned_board(&store, &auth, rename.board_id).await?;

    let board = store
        .rename_board(rename.board_id, &rename.title)
        .await?
        .ok_or_else(|| BackendError::not_found("Board not found"))?;
    tracing::info!("Board {} renamed", board.id);
    Ok(Json(board))
}

pub async fn delete_board(
    State(store): State<RecordStore>,
    AuthUser(auth): AuthUser,
    Payload(request): Payload<DeleteBoardRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let board_id = request.validate()?;
    owned_board(&store, &auth, board_id).await?;

    if !store.delete_board(board_id).await? {
        return Err(BackendError::not_found("Board not found"));
    }
    tracing::info!("Board {} deleted by {}", board_id, auth.user_id);
    Ok(Json(MessageResponse::new(
        "Board and associated columns and cards deleted successfully",
    )))
}
