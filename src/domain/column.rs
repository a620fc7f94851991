use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic role of a board column. Every board has exactly one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    Initial,
    Pending,
    Final,
    Canceled,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Initial => "INITIAL",
            ColumnType::Pending => "PENDING",
            ColumnType::Final => "FINAL",
            ColumnType::Canceled => "CANCELED",
        }
    }

    /// All roles in board order.
    pub fn all() -> &'static [ColumnType] {
        &[
            ColumnType::Initial,
            ColumnType::Pending,
            ColumnType::Final,
            ColumnType::Canceled,
        ]
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIAL" => Ok(ColumnType::Initial),
            "PENDING" => Ok(ColumnType::Pending),
            "FINAL" => Ok(ColumnType::Final),
            "CANCELED" => Ok(ColumnType::Canceled),
            _ => Err(format!("Invalid column type: {}", s)),
        }
    }
}
