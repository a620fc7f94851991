use serde::{Deserialize, Serialize};

use crate::domain::{BoardColumn, Card, ColumnType, Transition};

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub board_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// A card plus the column it currently sits in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardResponse {
    #[serde(flatten)]
    pub card: Card,
    pub board_id: String,
    pub column_name: String,
    pub column_type: ColumnType,
}

impl CardResponse {
    pub fn from_card(card: Card, column: &BoardColumn) -> Self {
        Self {
            card,
            board_id: column.board_id.clone(),
            column_name: column.name.clone(),
            column_type: column.column_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    #[serde(flatten)]
    pub card: CardResponse,
    pub transition: Transition,
}
