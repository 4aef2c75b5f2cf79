use anyhow::Result;
use webhook_service::{
    clients::database::AttemptRecorder,
    delivery::DeliveryScheduler,
    models::{history::CreateHistoryEntry, retry::DeliveryPolicy},
};

use crate::support::{ScriptedSender, settlement_notification, start_postgres};

/// Test: Each recorded attempt becomes its own row
#[tokio::test]
#[ignore = "requires docker"]
async fn test_record_appends_rows() -> Result<()> {
    let (_container, store) = start_postgres().await?;

    for status in [503, 503, 200] {
        let entry = CreateHistoryEntry::new(
            "trx-pg".to_string(),
            "settlement".to_string(),
            r#"{"transaction_id":"trx-pg"}"#.to_string(),
        )
        .with_status(status);
        store.record(entry).await?;
    }

    let rows = store.history_for_transaction("trx-pg").await?;
    assert_eq!(rows.len(), 3);

    let statuses: Vec<i32> = rows.iter().map(|row| row.status).collect();
    assert_eq!(statuses, vec![503, 503, 200]);
    assert!(
        rows.windows(2).all(|pair| pair[0].id < pair[1].id),
        "Rows should come back in insertion order"
    );
    assert!(rows[2].success);
    assert!(rows.iter().all(|row| row.event_type == "settlement"));

    Ok(())
}

/// Test: Running the migration twice is harmless
#[tokio::test]
#[ignore = "requires docker"]
async fn test_migrate_is_idempotent() -> Result<()> {
    let (_container, store) = start_postgres().await?;

    store.migrate().await?;
    store.migrate().await?;

    assert!(store.history_for_transaction("missing").await?.is_empty());

    Ok(())
}

/// Test: A delivery against a real database writes one row per attempt
#[tokio::test]
#[ignore = "requires docker"]
async fn test_delivery_history_matches_attempts() -> Result<()> {
    let (_container, store) = start_postgres().await?;

    let sender = ScriptedSender::always(200);
    let scheduler = DeliveryScheduler::new(sender.clone(), store.clone(), DeliveryPolicy::default());

    let notification = settlement_notification("trx-pg-delivery");
    scheduler.deliver("http://merchant.test/callback", &notification).await?;
    scheduler.deliver("http://merchant.test/callback", &notification).await?;

    let rows = store.history_for_transaction("trx-pg-delivery").await?;
    assert_eq!(rows.len(), sender.calls());
    assert_eq!(rows[0].data, serde_json::to_string(&notification)?);

    Ok(())
}
