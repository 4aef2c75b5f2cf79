use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    clients::{database::AttemptRecorder, webhook::NotificationSender},
    delivery::DeliveryScheduler,
    models::{notification::NotificationRequest, outcome::DeliveryOutcome, retry::DeliveryPolicy},
};

/// Entry point for the charge layer: one call per transaction status change.
///
/// Deliveries for the same transaction are not coordinated. Triggering twice
/// sends twice and records both sequences.
pub struct WebhookNotifier<S, R> {
    scheduler: Arc<DeliveryScheduler<S, R>>,
    callback_url: String,
}

impl<S, R> Clone for WebhookNotifier<S, R> {
    fn clone(&self) -> Self {
        Self {
            scheduler: Arc::clone(&self.scheduler),
            callback_url: self.callback_url.clone(),
        }
    }
}

impl<S, R> WebhookNotifier<S, R>
where
    S: NotificationSender + 'static,
    R: AttemptRecorder + 'static,
{
    pub fn new(scheduler: DeliveryScheduler<S, R>, callback_url: String) -> Self {
        info!(callback_url = %callback_url, "Webhook notifier initialized");

        Self {
            scheduler: Arc::new(scheduler),
            callback_url,
        }
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    pub fn policy(&self) -> &DeliveryPolicy {
        self.scheduler.policy()
    }

    /// Runs the full delivery sequence, backoff sleeps included.
    ///
    /// Nothing is returned to the caller. The outcome is logged and the
    /// attempt history is the only durable record of what happened.
    pub async fn notify_transaction_status_changed(
        &self,
        transaction_id: &str,
        notification: NotificationRequest,
    ) {
        if notification.transaction_id != transaction_id {
            warn!(
                transaction_id,
                payload_transaction_id = %notification.transaction_id,
                "Notification payload belongs to a different transaction"
            );
        }

        match self
            .scheduler
            .deliver(&self.callback_url, &notification)
            .await
        {
            Ok(DeliveryOutcome::Delivered { attempts, status }) => {
                info!(
                    transaction_id,
                    attempts,
                    status = status.as_u16(),
                    "Transaction status notification delivered"
                );
            }
            Ok(DeliveryOutcome::GaveUp {
                attempts,
                last_status,
                reason,
            }) => {
                warn!(
                    transaction_id,
                    attempts,
                    last_status = last_status.as_u16(),
                    reason = %reason,
                    "Transaction status notification was not accepted"
                );
            }
            Err(e) => {
                error!(
                    transaction_id,
                    error = %e,
                    "Transaction status notification aborted"
                );
            }
        }
    }

    pub fn notify_in_background(
        &self,
        transaction_id: String,
        notification: NotificationRequest,
    ) -> JoinHandle<()> {
        let notifier = self.clone();

        tokio::spawn(async move {
            notifier
                .notify_transaction_status_changed(&transaction_id, notification)
                .await;
        })
    }
}
