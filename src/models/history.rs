use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `webhook_history`, as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebhookHistory {
    pub id: i64,
    pub transaction_id: String,
    pub event_type: String,
    pub status: i32,
    pub data: String,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

/// A delivery attempt waiting to be appended to the history log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateHistoryEntry {
    pub transaction_id: String,
    pub event_type: String,
    pub status: i32,
    pub data: String,
    pub success: bool,
}

impl CreateHistoryEntry {
    pub fn new(transaction_id: String, event_type: String, data: String) -> Self {
        Self {
            transaction_id,
            event_type,
            status: 0,
            data,
            success: false,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = i32::from(status);
        self.success = (200..=299).contains(&status);
        self
    }
}
