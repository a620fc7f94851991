use sqlx::SqlitePool;

use crate::api::dto::BoardResponse;
use crate::domain::layout::new_board;
use crate::domain::{Board, KanbanError};
use crate::infrastructure::{BoardRepository, CardRepository};

pub struct BoardService;

impl BoardService {
    /// Creates the board and its four template columns in one transaction.
    pub async fn create_board(pool: &SqlitePool, name: &str) -> Result<BoardResponse, KanbanError> {
        let (board, columns) = new_board(name)?;

        let mut tx = pool.begin().await?;
        BoardRepository::save_board(&mut *tx, &board, &columns).await?;
        tx.commit().await?;

        tracing::info!(board_id = board.id.as_str(), name = board.name.as_str(), "Board created");

        Ok(BoardResponse::from_board(board, columns, Vec::new()))
    }

    pub async fn list_boards(pool: &SqlitePool) -> Result<Vec<Board>, KanbanError> {
        let mut conn = pool.acquire().await?;
        BoardRepository::list_boards(&mut *conn).await
    }

    pub async fn get_board(pool: &SqlitePool, id: &str) -> Result<BoardResponse, KanbanError> {
        let mut conn = pool.acquire().await?;

        let board = BoardRepository::find_board_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| KanbanError::BoardNotFound(id.to_string()))?;
        let columns = BoardRepository::find_columns_by_board(&mut *conn, id).await?;
        let cards = CardRepository::find_cards_by_board(&mut *conn, id).await?;

        Ok(BoardResponse::from_board(board, columns, cards))
    }

    /// Removes the board along with its columns and cards.
    pub async fn delete_board(pool: &SqlitePool, id: &str) -> Result<(), KanbanError> {
        let mut tx = pool.begin().await?;
        if !BoardRepository::delete_board_by_id(&mut *tx, id).await? {
            return Err(KanbanError::BoardNotFound(id.to_string()));
        }
        tx.commit().await?;

        tracing::info!(board_id = id, "Board deleted");
        Ok(())
    }
}
