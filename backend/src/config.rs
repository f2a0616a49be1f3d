//! Server configuration, read from command-line flags or `FEDERATION_*`
//! environment variables.

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "federation", about = "Federates remote HTTP data sources into a shared catalog")]
pub struct ServerConfig {
    /// Address the HTTP API binds to.
    #[arg(long, env = "FEDERATION_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "FEDERATION_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite file holding the catalog collections.
    #[arg(long, env = "FEDERATION_DATABASE", default_value = "federation.sqlite")]
    pub database: PathBuf,

    #[arg(long, env = "FEDERATION_POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Number of readings kept for the active polling session.
    #[arg(long, env = "FEDERATION_HISTORY_CAPACITY", default_value_t = 10)]
    pub history_capacity: usize,

    #[arg(long, env = "FEDERATION_FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,

    /// Open the API root in the default browser once the server is up.
    #[arg(long)]
    pub open_browser: bool,
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn polling(&self) -> Result<PollingConfig, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Zero { option: "poll-interval-ms" });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Zero { option: "history-capacity" });
        }
        Ok(PollingConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            history_capacity: self.history_capacity,
        })
    }

    pub fn fetch_timeout(&self) -> Result<Duration, ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Zero { option: "fetch-timeout-secs" });
        }
        Ok(Duration::from_secs(self.fetch_timeout_secs))
    }
}

/// Cadence and retention of the polling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    pub interval: Duration,
    pub history_capacity: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            history_capacity: 10,
        }
    }
}
