//! Attempt loop for a single webhook delivery.
//!
//! ```text
//! deliver()
//!   for each attempt (capped by the backoff schedule):
//!     ├─ send      POST, bounded by min(attempt timeout, overall deadline)
//!     ├─ record    one history row, before any decision is made
//!     ├─ 2xx       → Delivered
//!     ├─ decide    retry budget assigned on the first failure, drawn down after
//!     └─ sleep     schedule slot for this attempt, unless it would cross the deadline
//! ```
//!
//! Transport and persistence failures end the sequence immediately.

use reqwest::StatusCode;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    clients::{database::AttemptRecorder, webhook::NotificationSender},
    error::{DeliveryError, SendError},
    models::{
        history::CreateHistoryEntry,
        notification::NotificationRequest,
        outcome::{DeliveryOutcome, GiveUpReason},
        retry::{DeliveryPolicy, RetryBudget},
    },
};

pub struct DeliveryScheduler<S, R> {
    sender: S,
    recorder: R,
    policy: DeliveryPolicy,
}

impl<S, R> DeliveryScheduler<S, R>
where
    S: NotificationSender,
    R: AttemptRecorder,
{
    pub fn new(sender: S, recorder: R, policy: DeliveryPolicy) -> Self {
        Self {
            sender,
            recorder,
            policy,
        }
    }

    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    pub async fn deliver(
        &self,
        destination: &str,
        notification: &NotificationRequest,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        let span = info_span!(
            "webhook_delivery",
            delivery_id = %Uuid::new_v4(),
            transaction_id = %notification.transaction_id,
            event_type = %notification.event_type(),
        );

        self.run(destination, notification).instrument(span).await
    }

    async fn run(
        &self,
        destination: &str,
        notification: &NotificationRequest,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        let data = serde_json::to_string(notification)?;
        // A deadline too far out to represent never binds.
        let deadline = Instant::now().checked_add(self.policy.overall_deadline);
        let max_attempts = self.policy.schedule.max_attempts();

        let mut budget: Option<RetryBudget> = None;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let status = self
                .send_attempt(destination, data.as_bytes(), deadline, attempt)
                .await?;

            let entry = CreateHistoryEntry::new(
                notification.transaction_id.clone(),
                notification.event_type().to_string(),
                data.clone(),
            )
            .with_status(status.as_u16());

            self.recorder
                .record(entry)
                .await
                .map_err(|source| DeliveryError::Persistence { attempt, source })?;

            if status.is_success() {
                info!(attempt, status = status.as_u16(), "Webhook delivered");
                return Ok(DeliveryOutcome::Delivered {
                    attempts: attempt,
                    status,
                });
            }

            let first_failure = budget.is_none();
            let current = budget.get_or_insert_with(|| RetryBudget::for_status(status));
            if first_failure {
                debug!(
                    status = status.as_u16(),
                    retry_budget = current.remaining(),
                    "Retry budget assigned from first failure"
                );
            }

            if !current.try_consume() {
                let reason = if first_failure {
                    GiveUpReason::NotRetryable
                } else {
                    GiveUpReason::BudgetExhausted
                };
                return Ok(self.give_up(attempt, status, reason));
            }
            let retries_left = current.remaining();

            let Some(wait) = self.policy.schedule.wait_after(attempt) else {
                return Ok(self.give_up(attempt, status, GiveUpReason::ScheduleExhausted));
            };

            let crosses_deadline = deadline.is_some_and(|deadline| {
                Instant::now()
                    .checked_add(wait)
                    .is_none_or(|next| next >= deadline)
            });
            if crosses_deadline {
                warn!(
                    attempt,
                    wait_secs = wait.as_secs(),
                    "Next attempt would fall past the delivery deadline"
                );
                return Err(DeliveryError::DeadlineExceeded {
                    deadline: self.policy.overall_deadline,
                    attempts: attempt,
                });
            }

            info!(
                attempt,
                max_attempts,
                status = status.as_u16(),
                retries_left,
                wait_secs = wait.as_secs(),
                "Webhook rejected, backing off"
            );

            sleep(wait).await;
        }
    }

    async fn send_attempt(
        &self,
        destination: &str,
        payload: &[u8],
        deadline: Option<Instant>,
        attempt: u32,
    ) -> Result<StatusCode, DeliveryError> {
        let attempt_deadline = Instant::now().checked_add(self.policy.attempt_timeout);
        let (limit, overall_binds) = match (deadline, attempt_deadline) {
            (Some(overall), Some(own)) if overall <= own => (Some(overall), true),
            (_, Some(own)) => (Some(own), false),
            (Some(overall), None) => (Some(overall), true),
            (None, None) => (None, false),
        };

        let send = self.sender.send(destination, payload);
        let response = match limit {
            Some(limit) => timeout_at(limit, send).await.ok(),
            None => Some(send.await),
        };

        match response {
            Some(Ok(status)) => Ok(status),
            Some(Err(source)) => {
                warn!(attempt, error = %source, "Webhook transport failure, giving up");
                Err(DeliveryError::Transport { attempt, source })
            }
            None if overall_binds => {
                warn!(attempt, "Delivery deadline expired during send");
                Err(DeliveryError::DeadlineExceeded {
                    deadline: self.policy.overall_deadline,
                    attempts: attempt,
                })
            }
            None => {
                warn!(attempt, "Webhook attempt exceeded its time limit");
                Err(DeliveryError::Transport {
                    attempt,
                    source: SendError::TimedOut {
                        after: self.policy.attempt_timeout,
                    },
                })
            }
        }
    }

    fn give_up(
        &self,
        attempts: u32,
        last_status: StatusCode,
        reason: GiveUpReason,
    ) -> DeliveryOutcome {
        warn!(
            attempts,
            last_status = last_status.as_u16(),
            reason = %reason,
            "Giving up on webhook delivery"
        );

        DeliveryOutcome::GaveUp {
            attempts,
            last_status,
            reason,
        }
    }
}
