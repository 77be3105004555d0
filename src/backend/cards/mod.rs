//! Cards Module
//!
//! HTTP handlers for `/card`. A column's cards form one sibling scope; a
//! move between columns touches two scopes at once.

pub mod types;
pub mod handlers;

pub use handlers::{create_card, delete_card, list_cards, modify_card, move_card, owned_card};
