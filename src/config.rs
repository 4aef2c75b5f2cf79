use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::retry::{BackoffSchedule, DeliveryPolicy};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub callback_url: String,

    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_backoff_schedule_secs")]
    pub webhook_backoff_schedule_secs: Vec<u64>,
    #[serde(default = "default_deadline_secs")]
    pub webhook_deadline_secs: u64,
    #[serde(default = "default_attempt_timeout_secs")]
    pub webhook_attempt_timeout_secs: u64,
    #[serde(default = "default_client_timeout_secs")]
    pub webhook_client_timeout_secs: u64,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn default_database_max_connections() -> u32 {
    20
}

fn default_backoff_schedule_secs() -> Vec<u64> {
    vec![120, 600, 1800, 5400, 12600]
}

fn default_deadline_secs() -> u64 {
    4 * 60 * 60
}

fn default_attempt_timeout_secs() -> u64 {
    3 * 60
}

fn default_client_timeout_secs() -> u64 {
    20
}

fn default_server_port() -> u16 {
    5000
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Parses `KEY=value` pairs the way `load` parses the process
    /// environment. Keys are matched case-insensitively.
    ///
    /// The delivery policy is validated here so a bad schedule or zero
    /// duration fails at startup rather than on first use.
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;

        config
            .delivery_policy()
            .map_err(|e| anyhow!("Invalid webhook delivery settings: {}", e))?;
        Ok(config)
    }

    pub fn delivery_policy(&self) -> Result<DeliveryPolicy, Error> {
        let schedule = BackoffSchedule::from_secs(&self.webhook_backoff_schedule_secs)?;

        let policy = DeliveryPolicy::new(
            schedule,
            Duration::from_secs(self.webhook_deadline_secs),
            Duration::from_secs(self.webhook_attempt_timeout_secs),
        )?;
        Ok(policy)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_client_timeout_secs)
    }
}
