use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::api::dto::CardResponse;
use crate::domain::{transition, BoardLayout, Card, ColumnType, KanbanError, Transition};
use crate::infrastructure::{BoardRepository, CardRepository};

pub struct CardService;

impl CardService {
    // ── Creation & lookup ──────────────────────────────────────

    /// Creates a card in the INITIAL column of `board_id`.
    pub async fn create_card(
        pool: &SqlitePool,
        board_id: &str,
        title: &str,
        description: &str,
    ) -> Result<CardResponse, KanbanError> {
        if title.trim().is_empty() {
            return Err(KanbanError::BadRequest("Card title must not be empty".into()));
        }

        let mut tx = pool.begin().await?;

        BoardRepository::find_board_by_id(&mut *tx, board_id)
            .await?
            .ok_or_else(|| KanbanError::BoardNotFound(board_id.to_string()))?;

        let layout = BoardLayout::new(BoardRepository::find_columns_by_board(&mut *tx, board_id).await?);
        let initial = layout.column_of_type(ColumnType::Initial)?;

        let card = Card::new(&initial.id, title, description);
        CardRepository::insert_card(&mut *tx, &card).await?;
        tx.commit().await?;

        tracing::info!(card_id = card.id.as_str(), board_id, "Card created");

        Ok(CardResponse::from_card(card, initial))
    }

    pub async fn get_card(pool: &SqlitePool, id: &str) -> Result<CardResponse, KanbanError> {
        let mut conn = pool.acquire().await?;
        let card = Self::load_card(&mut *conn, id).await?;
        let layout = Self::load_layout(&mut *conn, &card).await?;
        let column = layout.column(&card.column_id)?;
        Ok(CardResponse::from_card(card, column))
    }

    // ── Lifecycle ──────────────────────────────────────────────

    pub async fn move_to_next(
        pool: &SqlitePool,
        id: &str,
    ) -> Result<(CardResponse, Transition), KanbanError> {
        let (card, transition) = Self::apply(pool, id, |layout, card| {
            let transition = transition::advance(layout, card)?;
            Ok((transition, true))
        })
        .await?;

        tracing::info!(
            card_id = id,
            from = %transition.from,
            to = %transition.to,
            "Card advanced"
        );
        Ok((card, transition))
    }

    pub async fn cancel_card(
        pool: &SqlitePool,
        id: &str,
    ) -> Result<(CardResponse, Transition), KanbanError> {
        let (card, transition) = Self::apply(pool, id, |layout, card| {
            let transition = transition::cancel(layout, card)?;
            Ok((transition, !transition.is_noop()))
        })
        .await?;

        if transition.is_noop() {
            tracing::debug!(card_id = id, "Card already canceled");
        } else {
            tracing::info!(card_id = id, from = %transition.from, "Card canceled");
        }
        Ok((card, transition))
    }

    pub async fn block_card(
        pool: &SqlitePool,
        id: &str,
        reason: Option<&str>,
    ) -> Result<CardResponse, KanbanError> {
        let (card, ()) = Self::apply(pool, id, |_, card| {
            transition::block(card, reason)?;
            Ok(((), true))
        })
        .await?;

        tracing::info!(card_id = id, reason = card.card.block_reason.as_deref(), "Card blocked");
        Ok(card)
    }

    pub async fn unblock_card(
        pool: &SqlitePool,
        id: &str,
        reason: Option<&str>,
    ) -> Result<CardResponse, KanbanError> {
        let (card, ()) = Self::apply(pool, id, |_, card| {
            transition::unblock(card, reason)?;
            Ok(((), true))
        })
        .await?;

        tracing::info!(card_id = id, reason = card.card.unblock_reason.as_deref(), "Card unblocked");
        Ok(card)
    }

    // ── Helpers ────────────────────────────────────────────────

    /// Loads the card and its board layout, runs `rule` and persists the card
    /// when the rule reports a change, all inside one transaction. Any error
    /// drops the transaction, so nothing is written. Losing a write race on
    /// the same card reports `Conflict`.
    async fn apply<T, F>(
        pool: &SqlitePool,
        id: &str,
        rule: F,
    ) -> Result<(CardResponse, T), KanbanError>
    where
        F: FnOnce(&BoardLayout, &mut Card) -> Result<(T, bool), KanbanError>,
    {
        Self::apply_in_transaction(pool, id, rule)
            .await
            .map_err(|e| e.contention_as_conflict(id))
    }

    async fn apply_in_transaction<T, F>(
        pool: &SqlitePool,
        id: &str,
        rule: F,
    ) -> Result<(CardResponse, T), KanbanError>
    where
        F: FnOnce(&BoardLayout, &mut Card) -> Result<(T, bool), KanbanError>,
    {
        let mut tx = pool.begin().await?;

        let mut card = Self::load_card(&mut *tx, id).await?;
        let layout = Self::load_layout(&mut *tx, &card).await?;

        let (outcome, changed) = rule(&layout, &mut card)?;
        if changed {
            card.updated_at = Utc::now().to_rfc3339();
            CardRepository::save_card(&mut *tx, &mut card).await?;
        }
        tx.commit().await?;

        let column = layout.column(&card.column_id)?;
        Ok((CardResponse::from_card(card, column), outcome))
    }

    async fn load_card(conn: &mut SqliteConnection, id: &str) -> Result<Card, KanbanError> {
        CardRepository::find_card_by_id(conn, id)
            .await?
            .ok_or_else(|| KanbanError::CardNotFound(id.to_string()))
    }

    async fn load_layout(conn: &mut SqliteConnection, card: &Card) -> Result<BoardLayout, KanbanError> {
        let column = BoardRepository::find_column_by_id(conn, &card.column_id)
            .await?
            .ok_or_else(|| {
                KanbanError::InvariantViolation(format!(
                    "card {} references missing column {}",
                    card.id, card.column_id
                ))
            })?;

        let layout = BoardLayout::new(BoardRepository::find_columns_by_board(conn, &column.board_id).await?);
        layout.validate()?;
        Ok(layout)
    }
}
