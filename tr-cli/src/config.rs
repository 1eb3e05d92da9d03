//! Settings file handling

use anyhow::{Context, Result};
use std::path::Path;
use tr_model::{StorageType, TeensySettings};

/// Load settings from `path`, or defaults when no file is given
///
/// # Arguments
/// * `path` - JSON settings file; missing fields fall back to defaults
/// * `storage` - command-line override for the target storage
pub fn load_settings(path: Option<&Path>, storage: Option<StorageType>) -> Result<TeensySettings> {
    let mut settings = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            serde_json::from_str::<TeensySettings>(&content)
                .with_context(|| format!("Failed to parse settings file {}", path.display()))?
        }
        None => TeensySettings::default(),
    };

    if let Some(storage) = storage {
        settings.storage_type = storage;
    }
    log::debug!(
        "Settings: storage {}, root {}",
        settings.storage_type,
        settings.target_root_path
    );
    Ok(settings)
}
