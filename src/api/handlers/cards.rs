use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{CardResponse, CreateCardRequest, ReasonRequest, TransitionResponse};
use crate::api::handlers::sse::BoardEvent;
use crate::api::AppState;
use crate::domain::KanbanError;
use crate::services::CardService;

pub async fn create_card(
    State(state): State<AppState>,
    Json(req): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), KanbanError> {
    let pool = state.require_db()?;
    let description = req.description.unwrap_or_default();
    let card = CardService::create_card(pool, &req.board_id, &req.title, &description).await?;

    state.publish(&BoardEvent::CardCreated {
        board_id: card.board_id.clone(),
        card_id: card.card.id.clone(),
        title: card.card.title.clone(),
    });

    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let card = CardService::get_card(pool, &id).await?;
    Ok(Json(card))
}

pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, KanbanError> {
    let pool = state.require_db()?;
    let (card, transition) = CardService::move_to_next(pool, &id).await?;

    state.publish(&BoardEvent::CardMoved {
        board_id: card.board_id.clone(),
        card_id: id,
        from: transition.from,
        to: transition.to,
    });

    Ok(Json(TransitionResponse { card, transition }))
}

pub async fn cancel_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, KanbanError> {
    let pool = state.require_db()?;
    let (card, transition) = CardService::cancel_card(pool, &id).await?;

    if !transition.is_noop() {
        state.publish(&BoardEvent::CardMoved {
            board_id: card.board_id.clone(),
            card_id: id,
            from: transition.from,
            to: transition.to,
        });
    }

    Ok(Json(TransitionResponse { card, transition }))
}

pub async fn block_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let card = CardService::block_card(pool, &id, req.reason.as_deref()).await?;

    state.publish(&BoardEvent::CardBlocked {
        board_id: card.board_id.clone(),
        card_id: id,
        reason: card.card.block_reason.clone().unwrap_or_default(),
    });

    Ok(Json(card))
}

pub async fn unblock_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let card = CardService::unblock_card(pool, &id, req.reason.as_deref()).await?;

    state.publish(&BoardEvent::CardUnblocked {
        board_id: card.board_id.clone(),
        card_id: id,
        reason: card.card.unblock_reason.clone().unwrap_or_default(),
    });

    Ok(Json(card))
}
