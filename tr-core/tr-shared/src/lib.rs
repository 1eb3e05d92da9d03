//! Serial transport shared by every TeensyROM command.
//!
//! Provides the byte-level [`SerialIo`] abstraction, a `serialport` backed
//! implementation, a scripted fake for tests, and [`SharedSerial`], which
//! arbitrates between the background auto-reader and command exchanges.

pub mod shared;
pub mod transport;

pub use shared::{DEVICE_LOG_TARGET, DeviceOutput, SerialLease, SharedSerial};
pub use transport::{FakeSerialIo, SerialIo, TransportError};

#[cfg(feature = "serial")]
pub use transport::serial_port::SerialPortIo;
