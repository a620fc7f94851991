use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum KanbanError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("board invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Card {0} is blocked")]
    CardBlocked(String),

    #[error("Card {0} is already in the FINAL column")]
    AlreadyFinal(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Card {0} is finalized and cannot be canceled")]
    AlreadyFinalized(String),

    #[error("a reason is required to {0} a card")]
    MissingReason(&'static str),

    #[error("Card {0} was modified concurrently, retry the operation")]
    Conflict(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KanbanError {
    /// Turns SQLite lock contention (SQLITE_BUSY / SQLITE_LOCKED and their
    /// extended codes) on card `card_id` into `Conflict`; other errors pass through.
    pub fn contention_as_conflict(self, card_id: &str) -> Self {
        if let KanbanError::Database(sqlx::Error::Database(db_err)) = &self {
            let primary = db_err
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .map(|code| code & 0xff);
            if matches!(primary, Some(5) | Some(6)) {
                tracing::debug!(card_id, error = %db_err, "Lock contention on card write");
                return KanbanError::Conflict(card_id.to_string());
            }
        }
        self
    }

    /// Stable identifier of the error kind, rendered to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            KanbanError::BoardNotFound(_) => "board_not_found",
            KanbanError::CardNotFound(_) => "card_not_found",
            KanbanError::InvariantViolation(_) => "invariant_violation",
            KanbanError::CardBlocked(_) => "card_blocked",
            KanbanError::AlreadyFinal(_) => "already_final",
            KanbanError::InvalidTransition(_) => "invalid_transition",
            KanbanError::AlreadyFinalized(_) => "already_finalized",
            KanbanError::MissingReason(_) => "missing_reason",
            KanbanError::Conflict(_) => "conflict",
            KanbanError::BadRequest(_) => "bad_request",
            KanbanError::Internal(_) => "internal",
            KanbanError::Database(_) => "database",
            KanbanError::Serialization(_) => "serialization",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            KanbanError::BoardNotFound(_) | KanbanError::CardNotFound(_) => StatusCode::NOT_FOUND,
            KanbanError::MissingReason(_) | KanbanError::BadRequest(_) => StatusCode::BAD_REQUEST,
            KanbanError::CardBlocked(_)
            | KanbanError::AlreadyFinal(_)
            | KanbanError::InvalidTransition(_)
            | KanbanError::AlreadyFinalized(_)
            | KanbanError::Conflict(_) => StatusCode::CONFLICT,
            KanbanError::InvariantViolation(_)
            | KanbanError::Internal(_)
            | KanbanError::Database(_)
            | KanbanError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for KanbanError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            KanbanError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                "Internal server error".to_string()
            }
            KanbanError::Serialization(err) => {
                tracing::error!("Serialization error: {:?}", err);
                "Internal server error".to_string()
            }
            KanbanError::InvariantViolation(msg) => {
                tracing::error!("Invariant violation: {}", msg);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = json!({
            "error": message,
            "code": self.code(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_contention_errors_pass_through() {
        let err = KanbanError::Database(sqlx::Error::RowNotFound).contention_as_conflict("c1");
        assert!(matches!(err, KanbanError::Database(sqlx::Error::RowNotFound)));

        let err = KanbanError::CardBlocked("c1".into()).contention_as_conflict("c1");
        assert!(matches!(err, KanbanError::CardBlocked(_)));
    }

    #[test]
    fn test_conflict_renders_as_409() {
        let err = KanbanError::Conflict("c1".into());
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "conflict");
    }
}
