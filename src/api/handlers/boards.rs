use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{BoardResponse, CreateBoardRequest};
use crate::api::handlers::sse::BoardEvent;
use crate::api::state::AppState;
use crate::domain::{Board, KanbanError};
use crate::services::BoardService;

pub async fn list_boards(State(state): State<AppState>) -> Result<Json<Vec<Board>>, KanbanError> {
    let db = state.require_db()?;
    let boards = BoardService::list_boards(db).await?;
    Ok(Json(boards))
}

pub async fn create_board(
    State(state): State<AppState>,
    Json(req): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardResponse>), KanbanError> {
    let db = state.require_db()?;
    let board = BoardService::create_board(db, &req.name).await?;

    state.publish(&BoardEvent::BoardCreated {
        board_id: board.id.clone(),
        name: board.name.clone(),
    });

    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BoardResponse>, KanbanError> {
    let db = state.require_db()?;
    let board = BoardService::get_board(db, &id).await?;
    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, KanbanError> {
    let db = state.require_db()?;
    BoardService::delete_board(db, &id).await?;

    state.publish(&BoardEvent::BoardDeleted { board_id: id });

    Ok(StatusCode::NO_CONTENT)
}
