use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::{debug, error, info};

use crate::{
    error::HistoryError,
    models::history::{CreateHistoryEntry, WebhookHistory},
};

/// Append-only sink for delivery attempts.
#[async_trait]
pub trait AttemptRecorder: Send + Sync {
    /// Writes exactly one history row in its own transaction.
    async fn record(&self, entry: CreateHistoryEntry) -> Result<(), HistoryError>;
}

#[derive(Clone)]
pub struct HistoryStore {
    pool: PgPool,
}

impl HistoryStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        info!("Connecting to PostgreSQL database");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

        info!("PostgreSQL connection established");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates `webhook_history` and its lookup index if they are missing.
    pub async fn migrate(&self) -> Result<(), HistoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS webhook_history (
                id BIGSERIAL PRIMARY KEY,
                transaction_id VARCHAR(64) NOT NULL,
                event_type VARCHAR(50) NOT NULL,
                status INTEGER NOT NULL,
                data TEXT NOT NULL,
                success BOOLEAN NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS webhook_history_transaction_id_idx ON webhook_history (transaction_id)",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("webhook_history schema is up to date");
        Ok(())
    }

    /// Rows in insertion order. `id` breaks ties between equal timestamps.
    pub async fn history_for_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<WebhookHistory>, HistoryError> {
        let rows = sqlx::query_as::<_, WebhookHistory>(
            r#"
            SELECT id, transaction_id, event_type, status, data, success, created_at
            FROM webhook_history
            WHERE transaction_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl AttemptRecorder for HistoryStore {
    async fn record(&self, entry: CreateHistoryEntry) -> Result<(), HistoryError> {
        let mut tx = self.pool.begin().await?;

        // Dropping `tx` on the error path rolls the insert back.
        sqlx::query(
            r#"
            INSERT INTO webhook_history (
                transaction_id,
                event_type,
                status,
                data,
                success,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.transaction_id)
        .bind(&entry.event_type)
        .bind(entry.status)
        .bind(&entry.data)
        .bind(entry.success)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                transaction_id = %entry.transaction_id,
                "Failed to write webhook history"
            );
            e
        })?;

        tx.commit().await?;

        debug!(
            transaction_id = %entry.transaction_id,
            status = entry.status,
            success = entry.success,
            "Webhook history written to database"
        );

        Ok(())
    }
}
