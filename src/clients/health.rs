use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::database::HistoryStore,
    models::health::{HealthCheckResponse, ServiceHealth},
};

pub struct HealthChecker {
    store: HistoryStore,
}

impl HealthChecker {
    pub fn new(store: HistoryStore) -> Self {
        Self { store }
    }

    /// Overall status mirrors the history database.
    pub async fn check(&self) -> HealthCheckResponse {
        let database = self.check_database().await;

        HealthCheckResponse {
            status: database.status.clone(),
            timestamp: Utc::now(),
            database,
        }
    }

    async fn check_database(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.store.health_check().await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "History database reachable");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "History database unreachable");
                ServiceHealth::unhealthy(e.to_string())
            }
        }
    }
}
