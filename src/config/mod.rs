//! Configuration loaded from `~/.bubble-vote/config.toml`.
//!
//! The file is optional; when it does not exist every field falls back to its
//! `Default`. CLI flags (see [`crate::app`]) override what the file says.

mod duration;
mod io;
mod types;

pub use io::{
    config_dir, config_path, default_data_file, load_config, load_or_create_voter_token,
    parse_config, VOTER_TOKEN_FILE,
};
pub use types::{AppConfig, BubbleConfig, ClientConfig, ResetConfig, ServerConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(Box<toml::de::Error>),

    #[error("Invalid reset schedule: {0}")]
    InvalidReset(#[from] chrono::ParseError),

    #[error("Could not determine home directory")]
    HomeDirNotFound,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(Box::new(err))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
