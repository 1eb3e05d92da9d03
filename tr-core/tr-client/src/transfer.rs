//! Upload a batch of files with retries
//!
//! A file that already exists on the cartridge is deleted and the upload
//! retried at once; any other failure backs off before the next attempt.

use crate::client::TeensyClient;
use crate::config::TransferPolicy;
use crate::error::TeensyError;
use std::thread;
use tr_model::FileTransferItem;

const FILE_EXISTS_MESSAGE: &str = "file already exists";

/// Outcome of [`save_files`]
#[derive(Debug, Default)]
pub struct SaveFilesResult {
    pub successful: Vec<FileTransferItem>,
    pub failed: Vec<FileTransferItem>,
}

impl SaveFilesResult {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upload every item to its own destination
pub fn save_files(
    client: &TeensyClient,
    items: Vec<FileTransferItem>,
    policy: &TransferPolicy,
) -> SaveFilesResult {
    log::info!("Saving {} file(s) to the TeensyROM", items.len());

    let mut result = SaveFilesResult::default();
    for item in items {
        let destination = item.destination();
        log::info!("Saving file: {destination}");

        if save_with_retry(client, &item, &destination, policy) {
            log::info!("Save success: {destination}");
            result.successful.push(item);
        } else {
            log::error!(
                "Save failed: could not copy {} after {} attempt(s)",
                item.name(),
                policy.retry_limit
            );
            result.failed.push(item);
        }
    }
    result
}

fn is_duplicate(e: &TeensyError) -> bool {
    e.to_string().to_ascii_lowercase().contains(FILE_EXISTS_MESSAGE)
}

fn save_with_retry(
    client: &TeensyClient,
    item: &FileTransferItem,
    destination: &str,
    policy: &TransferPolicy,
) -> bool {
    let mut attempt = 0;
    while attempt < policy.retry_limit {
        let e = match client.try_save_file_to(item, destination) {
            Ok(()) => return true,
            Err(e) => e,
        };
        attempt += 1;

        if is_duplicate(&e) {
            log::warn!("Attempting to overwrite: {destination}");
            if let Err(e) = client.try_delete_file(destination, item.storage_type) {
                log::error!("Error deleting file {destination}: {e}");
            }
            continue;
        }

        log::warn!("Attempt {attempt} of {} failed: {e}", policy.retry_limit);
        if attempt < policy.retry_limit {
            thread::sleep(policy.retry_backoff * attempt);
        }
    }
    false
}
