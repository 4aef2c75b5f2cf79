use std::time::Duration;

/// Failure to obtain an HTTP response from the callback endpoint.
///
/// Only network-level problems end up here. A non-2xx response is not an
/// error at this layer; it is handed back to the scheduler as a status code.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook request timed out after {after:?}")]
    TimedOut { after: Duration },
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("backoff schedule must contain at least one entry")]
    EmptySchedule,

    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}

/// Fatal outcomes of a delivery sequence. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("failed to serialize notification request: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("attempt {attempt} could not reach the callback endpoint: {source}")]
    Transport { attempt: u32, source: SendError },

    #[error("attempt {attempt} could not be written to webhook history: {source}")]
    Persistence { attempt: u32, source: HistoryError },

    #[error("delivery deadline of {deadline:?} exceeded after {attempts} attempts")]
    DeadlineExceeded { deadline: Duration, attempts: u32 },
}
