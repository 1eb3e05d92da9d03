//! File transfer descriptor
//!
//! Wraps the bytes of a local file together with the length and checksum the
//! firmware expects in the upload header.

use crate::error::ModelError;
use crate::path::{ensure_unix_path_ending, unix_path_combine};
use crate::storage::TeensyFileType;
use crate::token::StorageType;
use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

/// Additive checksum: sum of all bytes, truncated to 16 bits
///
/// Only kept for wire compatibility. It detects very little.
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)))
}

/// A file ready to be uploaded to the cartridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransferItem {
    name: String,
    source_path: Option<String>,
    buffer: Vec<u8>,
    stream_length: u32,
    checksum: u16,
    /// Storage the file is uploaded to
    pub storage_type: StorageType,
    /// Directory on the cartridge, always ending in `/`
    target_directory: String,
}

impl FileTransferItem {
    /// Build a transfer from an in-memory buffer
    ///
    /// Empty buffers are rejected; the firmware treats a zero length as an error.
    pub fn from_bytes(
        name: &str,
        buffer: Vec<u8>,
        target_directory: &str,
        storage_type: StorageType,
    ) -> Result<Self, ModelError> {
        if buffer.is_empty() {
            return Err(ModelError::EmptyBuffer(name.to_string()));
        }
        let stream_length = u32::try_from(buffer.len()).map_err(|_| {
            ModelError::Io(format!("{name} is too large: {} bytes", buffer.len()))
        })?;
        Ok(Self {
            name: name.to_string(),
            source_path: None,
            checksum: checksum(&buffer),
            stream_length,
            buffer,
            storage_type,
            target_directory: ensure_unix_path_ending(target_directory),
        })
    }

    /// Read a local file, retrying transient I/O failures
    #[cfg(feature = "std")]
    pub fn from_path(
        path: &std::path::Path,
        target_directory: &str,
        storage_type: StorageType,
    ) -> Result<Self, ModelError> {
        const MAX_ATTEMPTS: u32 = 5;
        const RETRY_DELAY: std::time::Duration = std::time::Duration::from_millis(200);

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ModelError::Io(format!("Invalid file name: {}", path.display())))?
            .to_string();

        let mut attempt = 0;
        let buffer = loop {
            attempt += 1;
            match std::fs::read(path) {
                Ok(buffer) => break buffer,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(ModelError::Io(format!(
                        "A file was not found at: {}",
                        path.display()
                    )));
                }
                Err(e) if attempt >= MAX_ATTEMPTS => {
                    return Err(ModelError::Io(format!(
                        "Failed to read {} after {attempt} attempts: {e}",
                        path.display()
                    )));
                }
                Err(e) => {
                    log::debug!("Retrying read of {} ({e})", path.display());
                    std::thread::sleep(RETRY_DELAY);
                }
            }
        };

        let mut item = Self::from_bytes(&name, buffer, target_directory, storage_type)?;
        item.source_path = Some(path.display().to_string());
        Ok(item)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn stream_length(&self) -> u32 {
        self.stream_length
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn file_type(&self) -> TeensyFileType {
        TeensyFileType::from_path(&self.name)
    }

    pub fn target_directory(&self) -> &str {
        &self.target_directory
    }

    /// Point the transfer at a different directory on the cartridge
    pub fn set_target_directory(&mut self, directory: &str) {
        self.target_directory = ensure_unix_path_ending(directory);
    }

    /// Full destination path sent to the firmware
    pub fn destination(&self) -> String {
        unix_path_combine(&self.target_directory, &[&self.name])
    }
}
