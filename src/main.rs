use anyhow::{Error, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use webhook_service::{
    api::run_api_server,
    clients::{database::HistoryStore, webhook::HttpSender},
    config::Config,
    delivery::DeliveryScheduler,
    notifier::WebhookNotifier,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let policy = config.delivery_policy()?;

    let store = HistoryStore::connect(&config.database_url, config.database_max_connections).await?;
    store.migrate().await?;

    // The charge layer embeds `WebhookNotifier` directly. This process only
    // proves the wiring builds from config and serves /health for it.
    let sender = HttpSender::new(config.client_timeout())?;
    let scheduler = DeliveryScheduler::new(sender, store.clone(), policy);
    let notifier = WebhookNotifier::new(scheduler, config.callback_url.clone());

    info!(
        callback_url = notifier.callback_url(),
        max_attempts = notifier.policy().schedule.max_attempts(),
        "Configuration validated. Webhook delivery engine is ready."
    );

    run_api_server(config.server_port, store).await
}
