//! Blocking TeensyROM client

use crate::command::CommandContext;
use crate::commands;
use crate::config::ProtocolConfig;
use crate::error::TeensyError;
use tr_model::path::unix_path_combine;
use tr_model::{DirectoryContent, FileTransferItem, StorageType, TeensySettings};
use tr_shared::SharedSerial;

/// Runs commands against one connected cartridge
///
/// Each call leases the serial port for its exchange and releases it on
/// return, so calls from several threads are serialized. Settings are passed
/// per call; the client keeps no copy.
///
/// Methods come in pairs: `try_*` returns the error, the plain form logs it and
/// reports success as a `bool` (or `Option`).
#[derive(Debug, Clone)]
pub struct TeensyClient {
    serial: SharedSerial,
    config: ProtocolConfig,
}

impl TeensyClient {
    pub fn new(serial: SharedSerial, config: ProtocolConfig) -> Self {
        Self { serial, config }
    }

    pub fn serial(&self) -> &SharedSerial {
        &self.serial
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the port
    ///
    /// The background reader is paused for the duration of `f` and resumes on
    /// every exit path.
    pub fn exchange<T>(
        &self,
        f: impl FnOnce(&mut CommandContext<'_>) -> Result<T, TeensyError>,
    ) -> Result<T, TeensyError> {
        let lease = self.serial.lease()?;
        let mut ctx = CommandContext::new(lease, &self.config);
        f(&mut ctx)
    }

    pub fn ping(&self) -> Result<(), TeensyError> {
        self.exchange(commands::send_ping)
    }

    pub fn reset(&self) -> Result<(), TeensyError> {
        self.exchange(commands::send_reset)
    }

    pub fn try_launch_file(&self, path: &str, settings: &TeensySettings) -> Result<(), TeensyError> {
        self.exchange(|ctx| commands::launch_file(ctx, path, settings.storage_type))
    }

    /// Launch a file from the configured storage
    pub fn launch_file(&self, path: &str, settings: &TeensySettings) -> bool {
        log_failure("Launch", path, self.try_launch_file(path, settings))
    }

    /// Upload to the directory configured for the item's file type
    ///
    /// # Returns
    /// * The destination path on the cartridge
    pub fn try_save_file(
        &self,
        item: &FileTransferItem,
        settings: &TeensySettings,
    ) -> Result<String, TeensyError> {
        let directory = settings.target_directory(item.file_type())?;
        let destination = unix_path_combine(&directory, &[item.name()]);
        self.exchange(|ctx| commands::save_file(ctx, item, &destination, settings.storage_type))?;
        Ok(destination)
    }

    pub fn save_file(&self, item: &FileTransferItem, settings: &TeensySettings) -> bool {
        log_failure("Save", item.name(), self.try_save_file(item, settings))
    }

    /// Upload to an explicit destination on the item's own storage
    pub fn try_save_file_to(&self, item: &FileTransferItem, destination: &str) -> Result<(), TeensyError> {
        self.exchange(|ctx| commands::save_file(ctx, item, destination, item.storage_type))
    }

    pub fn save_file_to(&self, item: &FileTransferItem, destination: &str) -> bool {
        log_failure("Save", destination, self.try_save_file_to(item, destination))
    }

    pub fn try_copy_file(
        &self,
        source: &str,
        destination: &str,
        settings: &TeensySettings,
    ) -> Result<(), TeensyError> {
        self.exchange(|ctx| commands::copy_file(ctx, source, destination, settings.storage_type))
    }

    pub fn copy_file(&self, source: &str, destination: &str, settings: &TeensySettings) -> bool {
        log_failure("Copy", source, self.try_copy_file(source, destination, settings))
    }

    pub fn try_delete_file(&self, path: &str, storage: StorageType) -> Result<(), TeensyError> {
        self.exchange(|ctx| commands::delete_file(ctx, path, storage))
    }

    pub fn delete_file(&self, path: &str, settings: &TeensySettings) -> bool {
        log_failure("Delete", path, self.try_delete_file(path, settings.storage_type))
    }

    pub fn try_toggle_music(&self) -> Result<(), TeensyError> {
        self.exchange(commands::toggle_music)
    }

    pub fn toggle_music(&self) -> bool {
        log_failure("Toggle music", "", self.try_toggle_music())
    }

    pub fn try_get_directory(
        &self,
        path: &str,
        skip: u16,
        take: u16,
        settings: &TeensySettings,
    ) -> Result<DirectoryContent, TeensyError> {
        self.exchange(|ctx| commands::get_directory(ctx, path, settings.storage_type, skip, take))
    }

    /// List a directory, `None` on any failure
    pub fn get_directory(
        &self,
        path: &str,
        skip: u16,
        take: u16,
        settings: &TeensySettings,
    ) -> Option<DirectoryContent> {
        match self.try_get_directory(path, skip, take, settings) {
            Ok(content) => Some(content),
            Err(e) => {
                log::error!("Error getting directory {path}: {e}");
                None
            }
        }
    }
}

fn log_failure<T>(action: &str, subject: &str, result: Result<T, TeensyError>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) if subject.is_empty() => {
            log::error!("{action} failed: {e}");
            false
        }
        Err(e) => {
            log::error!("{action} failed for {subject}: {e}");
            false
        }
    }
}
