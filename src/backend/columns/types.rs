/**
 * Column Request Types
 *
 * Raw bodies keep every field optional so that a missing field becomes
 * the API's own 400 message rather than a deserialization error.
 * `validate()` turns them into typed requests.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::validation::{non_blank, parse_id};

/// `GET /column?board_id=`
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ListColumnsQuery {
    pub board_id: Option<String>,
}

impl ListColumnsQuery {
    pub fn validate(self) -> Result<Uuid, BackendError> {
        let board_id = non_blank(self.board_id)
            .ok_or_else(|| BackendError::bad_request("board_id is required"))?;
        parse_id(&board_id).ok_or_else(|| BackendError::not_found("Board not found"))
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CreateColumnRequest {
    pub board_id: Option<String>,
    pub title: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewColumnRequest {
    pub board_id: Uuid,
    pub title: String,
    /// Requested rank; appended when absent
    pub order: Option<i64>,
}

impl CreateColumnRequest {
    pub fn validate(self) -> Result<NewColumnRequest, BackendError> {
        let (Some(board_id), Some(title)) = (non_blank(self.board_id), non_blank(self.title)) else {
            return Err(BackendError::bad_request("board_id and title are required"));
        };
        Ok(NewColumnRequest {
            board_id: parse_id(&board_id).ok_or_else(|| BackendError::not_found("Board not found"))?,
            title: title.trim().to_string(),
            order: self.order,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ModifyColumnRequest {
    pub column_id: Option<String>,
    pub title: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChange {
    pub column_id: Uuid,
    pub title: Option<String>,
    pub order: Option<i64>,
}

impl ModifyColumnRequest {
    /// `order: 0` is a change like any other rank
    pub fn validate(self) -> Result<ColumnChange, BackendError> {
        let title = non_blank(self.title).map(|t| t.trim().to_string());
        if title.is_none() && self.order.is_none() {
            return Err(BackendError::bad_request("Nothing to modify"));
        }
        let column_id = non_blank(self.column_id)
            .ok_or_else(|| BackendError::bad_request("column_id is required"))?;
        Ok(ColumnChange {
            column_id: column_id_of(&column_id)?,
            title,
            order: self.order,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct DeleteColumnRequest {
    pub column_id: Option<String>,
}

impl DeleteColumnRequest {
    pub fn validate(self) -> Result<Uuid, BackendError> {
        let column_id = non_blank(self.column_id)
            .ok_or_else(|| BackendError::bad_request("column_id is required"))?;
        column_id_of(&column_id)
    }
}

fn column_id_of(raw: &str) -> Result<Uuid, BackendError> {
    parse_id(raw).ok_or_else(|| BackendError::not_found("Column not found"))
}
