use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::api::handlers::sse::BoardEvent;
use crate::config::Config;
use crate::domain::KanbanError;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Option<SqlitePool>,
    pub sse_tx: broadcast::Sender<String>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        db: Option<SqlitePool>,
        sse_tx: broadcast::Sender<String>,
        config: Arc<Config>,
    ) -> Self {
        Self { db, sse_tx, config }
    }

    pub fn require_db(&self) -> Result<&SqlitePool, KanbanError> {
        self.db
            .as_ref()
            .ok_or_else(|| KanbanError::Internal("Database not available".into()))
    }

    /// Broadcasts to event stream subscribers; dropped silently when nobody listens.
    pub fn publish(&self, event: &BoardEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = self.sse_tx.send(payload);
        }
    }
}
