//! TeensyROM wire and storage model.
//!
//! Shared types for talking to a TeensyROM cartridge: the 16-bit command tokens
//! understood by the firmware, storage selectors, directory listing entries,
//! file transfer descriptors and the settings snapshot commands consume.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod path;
pub mod settings;
pub mod storage;
pub mod token;
pub mod transfer;

pub use error::ModelError;
pub use settings::{FileTarget, TeensySettings};
pub use storage::{DirectoryContent, DirectoryItem, FileItem, TeensyFileType};
pub use token::{IntWidth, StorageType, TeensyToken, decode_int, encode_int};
pub use transfer::{FileTransferItem, checksum};
