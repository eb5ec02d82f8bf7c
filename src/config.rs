use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Per-thermostat settings, typically loaded from a JSON config entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThermostatConfig {
    pub host: String,
    #[serde(default)]
    pub hold_temp: bool,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ThermostatConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            hold_temp: false,
            protocol: default_protocol(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Error::InvalidInput(format!("bad config: {e}")))?;
        if config.host.is_empty() {
            return Err(Error::InvalidInput("config host is empty".to_string()));
        }
        if config.poll_interval_secs == 0 {
            return Err(Error::InvalidInput(
                "poll_interval_secs must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
