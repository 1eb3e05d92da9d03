//! Error types for tr-model

use crate::storage::TeensyFileType;
use alloc::string::String;
use core::fmt;

/// Error type for model-level operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No target directory is configured for the file type
    UnsupportedFileType(TeensyFileType),
    /// A transfer was requested for an empty buffer
    EmptyBuffer(String),
    /// Reading a local file failed
    Io(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnsupportedFileType(file_type) => {
                write!(f, "Unsupported file type: {file_type:?}")
            }
            ModelError::EmptyBuffer(name) => write!(f, "Buffer for {name} is empty"),
            ModelError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ModelError {}
