//! TeensyROM command client.
//!
//! Implements the binary serial protocol the cartridge firmware speaks: ping,
//! reset, launch, upload, copy, delete, music toggle and directory listing.
//! Commands run over a [`tr_shared::SharedSerial`] and lease it for the length
//! of one exchange.
//!
//! ```no_run
//! use std::time::Duration;
//! use tr_client::{ProtocolConfig, TeensyClient};
//! use tr_model::TeensySettings;
//! use tr_shared::{SerialPortIo, SharedSerial};
//!
//! let io = SerialPortIo::open("/dev/ttyACM0", 115_200, Duration::from_millis(50)).unwrap();
//! let client = TeensyClient::new(SharedSerial::new(Box::new(io)), ProtocolConfig::default());
//! let settings = TeensySettings::default();
//! if let Some(listing) = client.get_directory("/music", 0, 100, &settings) {
//!     println!("{} entries", listing.total_count());
//! }
//! ```

pub mod async_client;
pub mod client;
pub mod command;
pub mod commands;
pub mod config;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod transfer;

pub use async_client::AsyncTeensyClient;
pub use client::TeensyClient;
pub use command::{AckResponse, CommandContext};
pub use config::{ProtocolConfig, TransferPolicy};
pub use decode::{RawDirectory, accumulate_directory_bytes, decode_directory};
pub use discovery::{DeviceResponse, classify_response, connect_first, sorted_ports, verify_device};
pub use error::TeensyError;
pub use transfer::{SaveFilesResult, save_files};
