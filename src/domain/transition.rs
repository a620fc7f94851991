//! Card lifecycle rules.
//!
//! Every function here validates completely before touching the card, so a
//! failed call leaves it exactly as it was. Persistence is the caller's job.

use serde::Serialize;

use crate::domain::{BoardLayout, Card, ColumnType, KanbanError};

/// Column roles a card moved between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: ColumnType,
    pub to: ColumnType,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Moves the card to the next column by position. CANCELED is never a
/// valid target here; it is only reachable through [`cancel`].
pub fn advance(layout: &BoardLayout, card: &mut Card) -> Result<Transition, KanbanError> {
    if card.blocked {
        return Err(KanbanError::CardBlocked(card.id.clone()));
    }

    let current = layout.column(&card.column_id)?;
    if current.column_type == ColumnType::Final {
        return Err(KanbanError::AlreadyFinal(card.id.clone()));
    }

    let next = layout
        .position_of(&current.id)
        .and_then(|index| layout.columns().get(index + 1))
        .ok_or_else(|| {
            KanbanError::InvalidTransition(format!(
                "no column follows {} for card {}",
                current.column_type, card.id
            ))
        })?;

    if next.column_type == ColumnType::Canceled {
        return Err(KanbanError::InvalidTransition(format!(
            "card {} cannot advance into {}, cancel it instead",
            card.id, next.column_type
        )));
    }

    let transition = Transition {
        from: current.column_type,
        to: next.column_type,
    };
    card.column_id = next.id.clone();
    Ok(transition)
}

/// Sends the card straight to the CANCELED column. Ignores the blocked flag.
pub fn cancel(layout: &BoardLayout, card: &mut Card) -> Result<Transition, KanbanError> {
    let current = layout.column(&card.column_id)?;
    if current.column_type == ColumnType::Final {
        return Err(KanbanError::AlreadyFinalized(card.id.clone()));
    }

    let canceled = layout.column_of_type(ColumnType::Canceled)?;
    let transition = Transition {
        from: current.column_type,
        to: canceled.column_type,
    };
    card.column_id = canceled.id.clone();
    Ok(transition)
}

pub fn block(card: &mut Card, reason: Option<&str>) -> Result<(), KanbanError> {
    let reason = require_reason(reason, "block")?;
    card.blocked = true;
    card.block_reason = Some(reason.to_string());
    Ok(())
}

/// Clears the blocked flag unconditionally, even on a card that was never
/// blocked. The previous block reason stays as the audit trail.
pub fn unblock(card: &mut Card, reason: Option<&str>) -> Result<(), KanbanError> {
    let reason = require_reason(reason, "unblock")?;
    card.blocked = false;
    card.unblock_reason = Some(reason.to_string());
    Ok(())
}

fn require_reason<'a>(reason: Option<&'a str>, action: &'static str) -> Result<&'a str, KanbanError> {
    match reason {
        Some(r) if !r.trim().is_empty() => Ok(r),
        _ => Err(KanbanError::MissingReason(action)),
    }
}
