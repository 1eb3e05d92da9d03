//! Storage entries reported by the cartridge

pub mod file_type;
pub mod items;

pub use file_type::TeensyFileType;
pub use items::{DirectoryContent, DirectoryItem, FileItem};
