/**
 * Card Request Types
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::validation::{is_hex_color, non_blank, parse_id, DEFAULT_CARD_COLOR};
use crate::shared::Card;

/// Returned with a card created with an invalid color
pub const INVALID_COLOR_WARNING: &str = "Invalid color format. Card created without color.";

/// `GET /card?column_id=`
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ListCardsQuery {
    pub column_id: Option<String>,
}

impl ListCardsQuery {
    pub fn validate(self) -> Result<Uuid, BackendError> {
        let column_id = non_blank(self.column_id)
            .ok_or_else(|| BackendError::bad_request("column_id is required"))?;
        column_id_of(&column_id)
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CreateCardRequest {
    pub column_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCardRequest {
    pub column_id: Uuid,
    pub title: String,
    pub description: String,
    pub color: String,
    pub order: Option<i64>,
    /// Set when a supplied color was rejected
    pub warning: Option<&'static str>,
}

impl CreateCardRequest {
    pub fn validate(self) -> Result<NewCardRequest, BackendError> {
        let (Some(column_id), Some(title), Some(description)) =
            (non_blank(self.column_id), non_blank(self.title), self.description)
        else {
            return Err(BackendError::bad_request(
                "column_id, title, and description are required",
            ));
        };

        let (color, warning) = match non_blank(self.color) {
            None => (DEFAULT_CARD_COLOR.to_string(), None),
            Some(color) if is_hex_color(color.trim()) => (color.trim().to_string(), None),
            Some(color) => {
                tracing::warn!("Rejected card color {:?}", color);
                (DEFAULT_CARD_COLOR.to_string(), Some(INVALID_COLOR_WARNING))
            }
        };

        Ok(NewCardRequest {
            column_id: column_id_of(&column_id)?,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            color,
            order: self.order,
            warning,
        })
    }
}

/// `POST /card` response
#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedCard {
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ModifyCardRequest {
    pub card_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardChange {
    pub card_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Only a valid `#RRGGBB` color survives validation
    pub color: Option<String>,
    pub order: Option<i64>,
}

impl ModifyCardRequest {
    pub fn validate(self) -> Result<CardChange, BackendError> {
        let title = non_blank(self.title).map(|t| t.trim().to_string());
        let description = non_blank(self.description).map(|d| d.trim().to_string());
        let color = non_blank(self.color).map(|c| c.trim().to_string());

        if title.is_none() && description.is_none() && color.is_none() && self.order.is_none() {
            return Err(BackendError::bad_request("Nothing to modify"));
        }
        let card_id = non_blank(self.card_id)
            .ok_or_else(|| BackendError::bad_request("card_id is required"))?;

        let color = color.filter(|color| {
            let valid = is_hex_color(color);
            if !valid {
                tracing::warn!("Ignoring invalid card color {:?}", color);
            }
            valid
        });

        Ok(CardChange {
            card_id: card_id_of(&card_id)?,
            title,
            description,
            color,
            order: self.order,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct MoveCardRequest {
    pub card_id: Option<String>,
    pub column_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardMove {
    pub card_id: Uuid,
    pub column_id: Uuid,
}

impl MoveCardRequest {
    pub fn validate(self) -> Result<CardMove, BackendError> {
        let (Some(card_id), Some(column_id)) = (non_blank(self.card_id), non_blank(self.column_id))
        else {
            return Err(BackendError::bad_request("card_id and column_id are required"));
        };
        Ok(CardMove {
            card_id: card_id_of(&card_id)?,
            column_id: parse_id(&column_id)
                .ok_or_else(|| BackendError::not_found("New column not found"))?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct DeleteCardRequest {
    pub card_id: Option<String>,
}

impl DeleteCardRequest {
    pub fn validate(self) -> Result<Uuid, BackendError> {
        let card_id = non_blank(self.card_id)
            .ok_or_else(|| BackendError::bad_request("card_id is required"))?;
        card_id_of(&card_id)
    }
}

fn card_id_of(raw: &str) -> Result<Uuid, BackendError> {
    parse_id(raw).ok_or_else(|| BackendError::not_found("Card not found"))
}

fn column_id_of(raw: &str) -> Result<Uuid, BackendError> {
    parse_id(raw).ok_or_else(|| BackendError::not_found("Column not found"))
}
