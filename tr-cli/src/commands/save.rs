//! Upload local files

use super::Session;
use crate::messages::{print_error, print_success};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tr_client::TransferPolicy;
use tr_model::{FileTransferItem, TeensyFileType, TeensySettings};

/// Build a transfer for `path`, targeting `to` or the configured directory
pub fn transfer_item(path: &Path, to: Option<&str>, settings: &TeensySettings) -> Result<FileTransferItem> {
    let name = path.to_string_lossy();
    let target = match to {
        Some(dir) => dir.to_string(),
        None => settings
            .target_directory(TeensyFileType::from_path(&name))
            .with_context(|| format!("No target directory for {name}; use --to"))?,
    };
    FileTransferItem::from_path(path, &target, settings.storage_type)
        .with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn handle_save(session: &Session, files: Vec<PathBuf>, to: Option<String>) -> Result<()> {
    let items = files
        .iter()
        .map(|path| transfer_item(path, to.as_deref(), &session.settings))
        .collect::<Result<Vec<_>>>()?;

    let result = session.client.save_files(items, TransferPolicy::default()).await?;

    for item in &result.successful {
        print_success(&format!("Saved {}", item.destination()), &[]);
    }
    if !result.all_succeeded() {
        for item in &result.failed {
            print_error(&format!("Failed to save {}", item.destination()), &[]);
        }
        bail!("{} of {} file(s) failed", result.failed.len(), files.len());
    }
    Ok(())
}
