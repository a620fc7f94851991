use serde::{Deserialize, Serialize};

use crate::domain::{Board, BoardColumn, Card, ColumnType};

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnResponse {
    pub id: String,
    pub name: String,
    pub position: i64,
    pub column_type: ColumnType,
    pub cards: Vec<Card>,
}

/// A board with its columns in position order, each holding its cards.
#[derive(Debug, Serialize, Deserialize)]
pub struct BoardResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub columns: Vec<ColumnResponse>,
}

impl BoardResponse {
    pub fn from_board(board: Board, columns: Vec<BoardColumn>, cards: Vec<Card>) -> Self {
        let mut columns: Vec<ColumnResponse> = columns
            .into_iter()
            .map(|c| ColumnResponse {
                id: c.id,
                name: c.name,
                position: c.position,
                column_type: c.column_type,
                cards: Vec::new(),
            })
            .collect();
        columns.sort_by_key(|c| c.position);

        for card in cards {
            if let Some(column) = columns.iter_mut().find(|c| c.id == card.column_id) {
                column.cards.push(card);
            }
        }

        Self {
            id: board.id,
            name: board.name,
            created_at: board.created_at,
            columns,
        }
    }

    pub fn column(&self, column_type: ColumnType) -> Option<&ColumnResponse> {
        self.columns.iter().find(|c| c.column_type == column_type)
    }
}
