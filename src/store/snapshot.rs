use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tokio::fs;

use super::{StoreError, StoreState};

/// Snapshot schema written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Read a snapshot, returning `None` when the file does not exist.
pub async fn read_snapshot(path: &Path) -> Result<Option<StoreState>, StoreError> {
    if !fs::try_exists(path).await? {
        return Ok(None);
    }
    let content = fs::read_to_string(path).await?;
    let state: StoreState = serde_json::from_str(&content)?;
    if state.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found: state.schema_version,
        });
    }
    Ok(Some(state))
}

/// Write a snapshot atomically (temp file in the target directory + persist).
///
/// The temp file is removed if any step fails. The caller must hold the
/// store lock.
pub async fn write_snapshot(path: &Path, state: &StoreState) -> Result<(), StoreError> {
    let parent = path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    fs::create_dir_all(&parent).await?;

    let file_name = path
        .file_name()
        .map_or_else(|| "items.json".to_string(), |n| n.to_string_lossy().into_owned());
    let target_path = path.to_path_buf();
    let content = serde_json::to_string_pretty(state)?;

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        let mut temp_file = tempfile::Builder::new()
            .prefix(&format!("{file_name}."))
            .suffix(".tmp")
            .tempfile_in(&parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;
        // Consumes the temp file; on error it is dropped and deleted.
        temp_file.persist(&target_path)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)??;
    Ok(())
}
