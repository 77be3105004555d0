/**
 * Board Request Types
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::validation::{non_blank, parse_id};

/// `GET /board?email=`
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ListBoardsQuery {
    pub email: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CreateBoardRequest {
    pub title: Option<String>,
}

impl CreateBoardRequest {
    pub fn validate(self) -> Result<String, BackendError> {
        non_blank(self.title)
            .map(|title| title.trim().to_string())
            .ok_or_else(|| BackendError::bad_request("Title is required"))
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateBoardRequest {
    pub board_id: Option<String>,
    pub title: Option<String>,
}

/// Validated board rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRename {
    pub board_id: Uuid,
    pub title: String,
}

impl UpdateBoardRequest {
    pub fn validate(self) -> Result<BoardRename, BackendError> {
        let (Some(board_id), Some(title)) = (non_blank(self.board_id), non_blank(self.title)) else {
            return Err(BackendError::bad_request("board_id and title are required"));
        };
        Ok(BoardRename {
            board_id: board_id_of(&board_id)?,
            title: title.trim().to_string(),
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct DeleteBoardRequest {
    pub board_id: Option<String>,
}

impl DeleteBoardRequest {
    pub fn validate(self) -> Result<Uuid, BackendError> {
        let board_id = non_blank(self.board_id)
            .ok_or_else(|| BackendError::bad_request("board_id is required"))?;
        board_id_of(&board_id)
    }
}

/// Parse a board id; an id that cannot exist is "Board not found"
pub fn board_id_of(raw: &str) -> Result<Uuid, BackendError> {
    parse_id(raw).ok_or_else(|| BackendError::not_found("Board not found"))
}
