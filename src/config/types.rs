use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::cors::DEFAULT_CORS_ORIGINS;
use crate::store::DailyReset;

/// Top-level configuration, deserialized from `config.toml`.
///
/// All tables are optional at the TOML level; missing fields resolve to their
/// `Default` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reset: ResetConfig,
    pub client: ClientConfig,
    pub bubble: BubbleConfig,
}

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub addr: String,
    /// Snapshot file; defaults to `items.json` in the config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Keep items in memory only.
    pub in_memory: bool,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:5000".to_string(),
            data_file: None,
            in_memory: false,
            cors_origins: DEFAULT_CORS_ORIGINS
                .split(',')
                .map(str::to_string)
                .collect(),
        }
    }
}

/// `[reset]` table: the daily wipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResetConfig {
    pub enabled: bool,
    /// Local wall-clock time, `HH:MM` or `HH:MM:SS`.
    pub at: String,
    /// Offset of the local clock from UTC, e.g. `+05:30`.
    pub utc_offset: String,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            at: "18:00:00".to_string(),
            utc_offset: "+05:30".to_string(),
        }
    }
}

impl ResetConfig {
    /// The parsed schedule, or `None` when resets are disabled.
    pub fn daily_reset(&self) -> Result<Option<DailyReset>, ConfigError> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(Some(DailyReset::parse(&self.at, &self.utc_offset)?))
    }
}

/// `[client]` table: how the synchronizer talks to the server and paces itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server_url: String,
    #[serde(with = "super::duration")]
    pub poll_interval: Duration,
    /// Delay between a successful vote and the follow-up refresh.
    #[serde(with = "super::duration")]
    pub resync_delay: Duration,
    #[serde(with = "super::duration")]
    pub pulse: Duration,
    /// How long notices stay on screen.
    #[serde(with = "super::duration")]
    pub notice_ttl: Duration,
    #[serde(
        with = "super::duration::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_timeout: Option<Duration>,
    /// Reuse a voter identity instead of getting a fresh one per process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: Duration::from_millis(4500),
            resync_delay: Duration::from_millis(600),
            pulse: Duration::from_millis(320),
            notice_ttl: Duration::from_millis(2500),
            request_timeout: None,
            voter_token: None,
        }
    }
}

/// `[bubble]` table: `size = base + sqrt(votes) * scale`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BubbleConfig {
    pub base: f64,
    pub scale: f64,
    pub max: f64,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            base: 64.0,
            scale: 16.0,
            max: 220.0,
        }
    }
}
