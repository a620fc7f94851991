use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::ColumnType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BoardColumn {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub position: i64,
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub blocked: bool,
    pub block_reason: Option<String>,
    pub unblock_reason: Option<String>,
    /// Bumped on every save; guards against lost updates.
    pub version: i64,
}

impl Card {
    /// A fresh, unblocked card placed in `column_id`.
    pub fn new(column_id: &str, title: &str, description: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            column_id: column_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: now.clone(),
            updated_at: now,
            blocked: false,
            block_reason: None,
            unblock_reason: None,
            version: 0,
        }
    }
}
