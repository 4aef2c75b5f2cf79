use std::time::Duration;

use reqwest::StatusCode;

use crate::error::PolicyError;

const DEFAULT_BACKOFF_SECS: [u64; 5] = [2 * 60, 10 * 60, 30 * 60, 90 * 60, 3 * 60 * 60 + 30 * 60];
const DEFAULT_DEADLINE: Duration = Duration::from_secs(4 * 60 * 60);
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Ordered wait durations between attempts. Slot `i` is the wait after
/// attempt `i + 1`; the number of slots caps the number of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffSchedule {
    slots: Vec<Duration>,
}

impl BackoffSchedule {
    pub fn new(slots: Vec<Duration>) -> Result<Self, PolicyError> {
        if slots.is_empty() {
            return Err(PolicyError::EmptySchedule);
        }
        Ok(Self { slots })
    }

    pub fn from_secs(secs: &[u64]) -> Result<Self, PolicyError> {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    pub fn max_attempts(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Wait before the attempt following `attempt` (1-based), or `None`
    /// once the schedule has no further attempt to offer.
    pub fn wait_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts() {
            return None;
        }
        let index = attempt.checked_sub(1)? as usize;
        self.slots.get(index).copied()
    }

    pub fn slots(&self) -> &[Duration] {
        &self.slots
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self {
            slots: DEFAULT_BACKOFF_SECS
                .iter()
                .copied()
                .map(Duration::from_secs)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub schedule: BackoffSchedule,
    pub overall_deadline: Duration,
    pub attempt_timeout: Duration,
}

impl DeliveryPolicy {
    pub fn new(
        schedule: BackoffSchedule,
        overall_deadline: Duration,
        attempt_timeout: Duration,
    ) -> Result<Self, PolicyError> {
        if overall_deadline.is_zero() {
            return Err(PolicyError::ZeroDuration {
                name: "overall_deadline",
            });
        }
        if attempt_timeout.is_zero() {
            return Err(PolicyError::ZeroDuration {
                name: "attempt_timeout",
            });
        }

        Ok(Self {
            schedule,
            overall_deadline,
            attempt_timeout,
        })
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            schedule: BackoffSchedule::default(),
            overall_deadline: DEFAULT_DEADLINE,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

/// Additional attempts allowed after the first failure of a sequence.
///
/// Assigned from the first non-2xx status only; later failures just draw it
/// down regardless of their status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: u32,
}

impl RetryBudget {
    pub fn for_status(status: StatusCode) -> Self {
        let remaining = match status.as_u16() {
            503 => 3,
            400 | 404 => 1,
            500 => 0,
            301 | 302 | 303 | 307 | 308 => 0,
            _ => 4,
        };
        Self { remaining }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Takes one retry from the budget, returning false if none was left.
    pub fn try_consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
