//! Wire tokens and fixed-width integer encoding
//!
//! Every command starts with a 16-bit token and most phases end with a 16-bit
//! acknowledgement. Integers go out most significant byte first.

use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// 16-bit control tokens shared with the cartridge firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeensyToken {
    /// Phase accepted
    Ack,
    /// Phase rejected, or the firmware aborted a listing
    Fail,
    Ping,
    Reset,
    LaunchFile,
    /// Toggles SID playback (pause/resume)
    PauseMusic,
    /// Upload a file to storage
    PostFile,
    CopyFile,
    DeleteFile,
    ListDirectory,
    /// Precedes the bracketed directory payload
    StartDirectoryList,
    /// Terminates the bracketed directory payload
    EndDirectoryList,
    /// A value that matches none of the known tokens
    Unknown(u16),
}

impl TeensyToken {
    /// Every known token, in no particular order
    pub const KNOWN: [TeensyToken; 12] = [
        TeensyToken::Ack,
        TeensyToken::Fail,
        TeensyToken::Ping,
        TeensyToken::Reset,
        TeensyToken::LaunchFile,
        TeensyToken::PauseMusic,
        TeensyToken::PostFile,
        TeensyToken::CopyFile,
        TeensyToken::DeleteFile,
        TeensyToken::ListDirectory,
        TeensyToken::StartDirectoryList,
        TeensyToken::EndDirectoryList,
    ];

    /// Raw wire value
    pub const fn value(self) -> u16 {
        match self {
            TeensyToken::Ack => 0x64CC,
            TeensyToken::Fail => 0x9B7F,
            TeensyToken::Ping => 0x6455,
            TeensyToken::Reset => 0x64EE,
            TeensyToken::LaunchFile => 0x6444,
            TeensyToken::PauseMusic => 0x6466,
            TeensyToken::PostFile => 0x64BB,
            TeensyToken::CopyFile => 0x64FF,
            TeensyToken::DeleteFile => 0x64CF,
            TeensyToken::ListDirectory => 0x64DD,
            TeensyToken::StartDirectoryList => 0x5A5A,
            TeensyToken::EndDirectoryList => 0xA5A5,
            TeensyToken::Unknown(value) => value,
        }
    }

    /// Classify a received 16-bit value
    pub fn from_u16(value: u16) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|token| token.value() == value)
            .unwrap_or(TeensyToken::Unknown(value))
    }

    /// Classify two received bytes (big-endian)
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self::from_u16(u16::from_be_bytes(bytes))
    }

    /// Wire representation
    pub fn to_bytes(self) -> [u8; 2] {
        self.value().to_be_bytes()
    }
}

impl fmt::Display for TeensyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeensyToken::Unknown(value) => write!(f, "Unknown(0x{value:04X})"),
            token => write!(f, "{token:?}(0x{:04X})", token.value()),
        }
    }
}

/// Storage selector sent as a single byte ahead of every path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageType {
    #[default]
    Sd,
    Usb,
}

impl StorageType {
    /// Byte the firmware expects (`SD_nUSB`)
    pub const fn token(self) -> u8 {
        match self {
            StorageType::Sd => 1,
            StorageType::Usb => 0,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Sd => write!(f, "SD"),
            StorageType::Usb => write!(f, "USB"),
        }
    }
}

/// Width of an integer field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    One,
    Two,
    Four,
}

impl IntWidth {
    pub const fn bytes(self) -> usize {
        match self {
            IntWidth::One => 1,
            IntWidth::Two => 2,
            IntWidth::Four => 4,
        }
    }
}

/// Encode the low `width` bytes of `value`, most significant first
///
/// Bits above the field width are dropped, matching what the firmware reads.
pub fn encode_int(value: u32, width: IntWidth) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    bytes[bytes.len() - width.bytes()..].to_vec()
}

/// Decode a big-endian integer of up to four bytes
///
/// Returns `None` for empty or over-long input.
pub fn decode_int(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }
    Some(bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
}
