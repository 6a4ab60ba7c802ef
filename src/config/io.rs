use std::path::{Path, PathBuf};

use tracing::debug;

use super::{AppConfig, ConfigError};
use crate::server::is_valid_token;

/// Name of the per-user directory under `$HOME`.
const CONFIG_DIR_NAME: &str = ".bubble-vote";

/// File under [`config_dir`] holding the client's voter token.
pub const VOTER_TOKEN_FILE: &str = "voter_token";

/// Resolve the per-user directory (`~/.bubble-vote`).
///
/// If `BUBBLE_VOTE_HOME` is set, that directory is used instead. This lets
/// tests and containers keep their data somewhere else.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(home) = std::env::var("BUBBLE_VOTE_HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|h| h.join(CONFIG_DIR_NAME))
        .ok_or(ConfigError::HomeDirNotFound)
}

/// Path of the config file (`~/.bubble-vote/config.toml`).
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default snapshot location (`~/.bubble-vote/items.json`).
pub fn default_data_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("items.json"))
}

/// Load the voter token kept in `dir`, minting and saving one if absent.
///
/// Client commands pin this token so repeated runs vote as the same voter.
pub fn load_or_create_voter_token(dir: &Path) -> Result<String, ConfigError> {
    let path = dir.join(VOTER_TOKEN_FILE);
    if path.exists() {
        let stored = std::fs::read_to_string(&path)?;
        let token = stored.trim();
        if is_valid_token(token) {
            return Ok(token.to_string());
        }
        debug!("Ignoring malformed voter token in {}", path.display());
    }

    let token = uuid::Uuid::new_v4().simple().to_string();
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, &token)?;
    debug!("Saved new voter token to {}", path.display());
    Ok(token)
}

/// Load configuration from `path`, or from [`config_path`] when `None`.
///
/// Returns `AppConfig::default()` if the file does not exist so callers
/// never need to handle the "absent file" case specially.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };

    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config = parse_config(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse a TOML document into an [`AppConfig`].
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}
