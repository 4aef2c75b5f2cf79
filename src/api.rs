use std::sync::Arc;

use anyhow::{Error, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    clients::{database::HistoryStore, health::HealthChecker},
    models::health::HealthStatus,
};

pub struct AppState {
    health_checker: HealthChecker,
}

pub fn router(store: HistoryStore) -> Router {
    let state = Arc::new(AppState {
        health_checker: HealthChecker::new(store),
    });

    Router::new()
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(port: u16, store: HistoryStore) -> Result<(), Error> {
    let app = router(store);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Webhook service health endpoint listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// 200 while history can be written, 503 otherwise.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
