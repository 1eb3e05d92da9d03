//! Directory listing entries
//!
//! Field names follow the JSON the firmware embeds in `[Dir]` / `[File]` chunks.

use super::TeensyFileType;
use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// A subdirectory in a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DirectoryItem {
    pub name: String,
    pub path: String,
}

/// A file in a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileItem {
    pub name: String,
    pub path: String,
    pub size: u64,
}

impl FileItem {
    pub fn file_type(&self) -> TeensyFileType {
        TeensyFileType::from_path(&self.path)
    }
}

/// Decoded result of one directory listing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryContent {
    pub directories: Vec<DirectoryItem>,
    pub files: Vec<FileItem>,
    /// The path that was requested, not one echoed by the device
    pub path: String,
}

impl DirectoryContent {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.directories.len() + self.files.len()
    }
}
