use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
    redirect,
};
use tracing::{debug, info};

use crate::error::SendError;

pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(20);

/// One POST of an already-serialized notification.
///
/// Any HTTP response, whatever its status, is `Ok`. Only failing to get a
/// response at all is an error.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, destination: &str, payload: &[u8]) -> Result<StatusCode, SendError>;
}

#[derive(Clone)]
pub struct HttpSender {
    http_client: Client,
}

impl HttpSender {
    pub fn new(timeout: Duration) -> Result<Self, SendError> {
        // Redirects are handed to the retry policy rather than followed.
        let http_client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        info!(timeout_ms = timeout.as_millis() as u64, "Webhook HTTP client initialized");

        Ok(Self { http_client })
    }
}

#[async_trait]
impl NotificationSender for HttpSender {
    async fn send(&self, destination: &str, payload: &[u8]) -> Result<StatusCode, SendError> {
        debug!(destination, bytes = payload.len(), "Sending webhook request");

        let response = self
            .http_client
            .post(destination)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload.to_vec())
            .send()
            .await?;

        let status = response.status();
        debug!(destination, status = status.as_u16(), "Webhook endpoint responded");

        Ok(status)
    }
}
