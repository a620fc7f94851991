//! The fixed four-column board template and the ordered view of a board's
//! columns that the transition rules run against.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Board, BoardColumn, ColumnType, KanbanError};

/// `(name, position, role)` of every column a new board gets, in order.
pub const BOARD_TEMPLATE: [(&str, i64, ColumnType); 4] = [
    ("Inicial", 1, ColumnType::Initial),
    ("Pendente", 2, ColumnType::Pending),
    ("Final", 3, ColumnType::Final),
    ("Cancelado", 4, ColumnType::Canceled),
];

/// Builds a board and its template columns. Nothing is persisted here.
pub fn new_board(name: &str) -> Result<(Board, Vec<BoardColumn>), KanbanError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(KanbanError::BadRequest("Board name must not be empty".into()));
    }

    let board = Board {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        created_at: Utc::now().to_rfc3339(),
    };

    let columns = BOARD_TEMPLATE
        .iter()
        .map(|(column_name, position, column_type)| BoardColumn {
            id: Uuid::new_v4().to_string(),
            board_id: board.id.clone(),
            name: column_name.to_string(),
            position: *position,
            column_type: *column_type,
        })
        .collect();

    Ok((board, columns))
}

/// Columns of one board, sorted by position.
#[derive(Debug, Clone)]
pub struct BoardLayout {
    columns: Vec<BoardColumn>,
}

impl BoardLayout {
    pub fn new(mut columns: Vec<BoardColumn>) -> Self {
        columns.sort_by_key(|c| c.position);
        Self { columns }
    }

    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    /// Checks the layout is exactly the template: one column per role,
    /// positions 1..=4 following role order.
    pub fn validate(&self) -> Result<(), KanbanError> {
        if self.columns.len() != BOARD_TEMPLATE.len() {
            return Err(KanbanError::InvariantViolation(format!(
                "expected {} columns, found {}",
                BOARD_TEMPLATE.len(),
                self.columns.len()
            )));
        }

        for (column, (_, position, column_type)) in self.columns.iter().zip(BOARD_TEMPLATE.iter()) {
            if column.position != *position || column.column_type != *column_type {
                return Err(KanbanError::InvariantViolation(format!(
                    "column {} at position {} has role {}, expected {} at position {}",
                    column.id, column.position, column.column_type, column_type, position
                )));
            }
        }

        Ok(())
    }

    pub fn column_of_type(&self, column_type: ColumnType) -> Result<&BoardColumn, KanbanError> {
        self.columns
            .iter()
            .find(|c| c.column_type == column_type)
            .ok_or_else(|| {
                KanbanError::InvariantViolation(format!("board has no {} column", column_type))
            })
    }

    pub fn column(&self, column_id: &str) -> Result<&BoardColumn, KanbanError> {
        self.columns
            .iter()
            .find(|c| c.id == column_id)
            .ok_or_else(|| {
                KanbanError::InvariantViolation(format!(
                    "column {} does not belong to this board",
                    column_id
                ))
            })
    }

    pub fn position_of(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }
}
