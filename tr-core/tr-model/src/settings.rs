//! Settings snapshot consumed by commands
//!
//! Commands receive an immutable copy per call, so a settings change never
//! lands halfway through an exchange.

use crate::error::ModelError;
use crate::path::{ensure_unix_path_ending, unix_path_combine};
use crate::storage::TeensyFileType;
use crate::token::StorageType;
use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// Where uploads of one file type land, relative to the target root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTarget {
    pub file_type: TeensyFileType,
    pub target_path: String,
}

impl FileTarget {
    pub fn new(file_type: TeensyFileType, target_path: &str) -> Self {
        Self {
            file_type,
            target_path: target_path.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeensySettings {
    /// Storage commands address unless told otherwise
    pub storage_type: StorageType,
    /// Root on the cartridge that upload targets are relative to
    pub target_root_path: String,
    pub file_targets: Vec<FileTarget>,
    /// Serial ports a cartridge was previously found on, tried first
    pub known_ports: Vec<String>,
}

impl Default for TeensySettings {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Sd,
            target_root_path: "/".to_string(),
            file_targets: default_file_targets(),
            known_ports: Vec::new(),
        }
    }
}

fn default_file_targets() -> Vec<FileTarget> {
    use TeensyFileType::*;
    vec![
        FileTarget::new(Sid, "music"),
        FileTarget::new(Prg, "games"),
        FileTarget::new(P00, "games"),
        FileTarget::new(Crt, "games"),
        FileTarget::new(D64, "games"),
        FileTarget::new(Kla, "images"),
        FileTarget::new(Koa, "images"),
        FileTarget::new(Art, "images"),
        FileTarget::new(Aas, "images"),
        FileTarget::new(Hpi, "images"),
        FileTarget::new(Seq, "images"),
        FileTarget::new(Txt, "text"),
        FileTarget::new(Hex, "firmware"),
    ]
}

impl TeensySettings {
    /// Directory uploads of `file_type` go to, ending in a single `/`
    pub fn target_directory(&self, file_type: TeensyFileType) -> Result<String, ModelError> {
        let target = self
            .file_targets
            .iter()
            .find(|t| t.file_type == file_type)
            .ok_or(ModelError::UnsupportedFileType(file_type))?;

        Ok(ensure_unix_path_ending(&unix_path_combine(
            &self.target_root_path,
            &[&target.target_path],
        )))
    }

    /// Remember a port a cartridge answered on
    pub fn remember_port(&mut self, port: &str) {
        if !self.known_ports.iter().any(|p| p == port) {
            self.known_ports.push(port.to_string());
        }
    }
}
