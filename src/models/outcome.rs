use std::fmt::{Display, Formatter, Result};

use reqwest::StatusCode;

/// Terminal state of a delivery sequence that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered {
        attempts: u32,
        status: StatusCode,
    },
    GaveUp {
        attempts: u32,
        last_status: StatusCode,
        reason: GiveUpReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveUpReason {
    /// The first failing status carries no retry budget (500, redirects).
    NotRetryable,
    BudgetExhausted,
    ScheduleExhausted,
}

impl DeliveryOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryOutcome::Delivered { attempts, .. } => *attempts,
            DeliveryOutcome::GaveUp { attempts, .. } => *attempts,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

impl Display for GiveUpReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            GiveUpReason::NotRetryable => write!(f, "not_retryable"),
            GiveUpReason::BudgetExhausted => write!(f, "budget_exhausted"),
            GiveUpReason::ScheduleExhausted => write!(f, "schedule_exhausted"),
        }
    }
}
