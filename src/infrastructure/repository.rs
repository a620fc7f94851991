//! Row-level persistence for boards, columns and cards.
//!
//! Functions take a bare connection so callers can compose them inside a
//! single transaction (`&mut *tx`).

use sqlx::SqliteConnection;

use crate::domain::{Board, BoardColumn, Card, KanbanError};

pub struct BoardRepository;

impl BoardRepository {
    /// Inserts the board together with all of its columns.
    pub async fn save_board(
        conn: &mut SqliteConnection,
        board: &Board,
        columns: &[BoardColumn],
    ) -> Result<(), KanbanError> {
        sqlx::query("INSERT INTO boards (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&board.id)
            .bind(&board.name)
            .bind(&board.created_at)
            .execute(&mut *conn)
            .await?;

        for column in columns {
            sqlx::query(
                "INSERT INTO board_columns (id, board_id, name, position, column_type) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&column.id)
            .bind(&column.board_id)
            .bind(&column.name)
            .bind(column.position)
            .bind(column.column_type)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    pub async fn find_board_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<Board>, KanbanError> {
        let board: Option<Board> = sqlx::query_as("SELECT id, name, created_at FROM boards WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(board)
    }

    pub async fn list_boards(conn: &mut SqliteConnection) -> Result<Vec<Board>, KanbanError> {
        let boards: Vec<Board> =
            sqlx::query_as("SELECT id, name, created_at FROM boards ORDER BY created_at ASC, id ASC")
                .fetch_all(&mut *conn)
                .await?;

        Ok(boards)
    }

    /// Deletes the board; columns and cards go with it through the foreign
    /// key cascade. Returns `false` when no such board existed.
    pub async fn delete_board_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<bool, KanbanError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_columns_by_board(
        conn: &mut SqliteConnection,
        board_id: &str,
    ) -> Result<Vec<BoardColumn>, KanbanError> {
        let columns: Vec<BoardColumn> = sqlx::query_as(
            "SELECT id, board_id, name, position, column_type FROM board_columns WHERE board_id = ? ORDER BY position ASC",
        )
        .bind(board_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(columns)
    }

    pub async fn find_column_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<BoardColumn>, KanbanError> {
        let column: Option<BoardColumn> = sqlx::query_as(
            "SELECT id, board_id, name, position, column_type FROM board_columns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(column)
    }
}

pub struct CardRepository;

impl CardRepository {
    pub async fn insert_card(conn: &mut SqliteConnection, card: &Card) -> Result<(), KanbanError> {
        sqlx::query(
            "INSERT INTO cards (id, column_id, title, description, created_at, updated_at, blocked, block_reason, unblock_reason, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&card.id)
        .bind(&card.column_id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(&card.created_at)
        .bind(&card.updated_at)
        .bind(card.blocked)
        .bind(&card.block_reason)
        .bind(&card.unblock_reason)
        .bind(card.version)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Writes the mutable state of `card` if nobody saved it since it was
    /// loaded, and bumps `card.version`. `created_at` is never rewritten.
    pub async fn save_card(conn: &mut SqliteConnection, card: &mut Card) -> Result<(), KanbanError> {
        let result = sqlx::query(
            "UPDATE cards SET column_id = ?, title = ?, description = ?, updated_at = ?, blocked = ?, block_reason = ?, unblock_reason = ?, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(&card.column_id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(&card.updated_at)
        .bind(card.blocked)
        .bind(&card.block_reason)
        .bind(&card.unblock_reason)
        .bind(&card.id)
        .bind(card.version)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::Conflict(card.id.clone()));
        }

        card.version += 1;
        Ok(())
    }

    pub async fn find_card_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<Card>, KanbanError> {
        let card: Option<Card> = sqlx::query_as("SELECT * FROM cards WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(card)
    }

    pub async fn find_cards_by_board(
        conn: &mut SqliteConnection,
        board_id: &str,
    ) -> Result<Vec<Card>, KanbanError> {
        let cards: Vec<Card> = sqlx::query_as(
            "SELECT c.* FROM cards c JOIN board_columns bc ON bc.id = c.column_id WHERE bc.board_id = ? ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(board_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(cards)
    }
}
