//! Byte-level transport trait
//!
//! Commands poll for available bytes and read/write raw buffers. A scripted
//! fake stands in for a cartridge in tests.

pub mod fake;
#[cfg(feature = "serial")]
pub mod serial_port;

pub use fake::FakeSerialIo;

use std::fmt;

/// Errors raised by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The port is not open
    NotOpen,
    /// The device went away mid-exchange
    ConnectionLost,
    /// Underlying I/O failure
    Io(String),
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotOpen => write!(f, "Serial port is not open"),
            TransportError::ConnectionLost => write!(f, "Connection lost"),
            TransportError::Io(msg) => write!(f, "I/O error: {msg}"),
            TransportError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// A serial connection to a cartridge
///
/// Reads never block for long: `read` returns whatever is available (possibly
/// zero bytes) and callers poll [`SerialIo::bytes_to_read`] with their own deadline.
pub trait SerialIo: Send {
    /// Name of the underlying port, for logging
    fn name(&self) -> &str;

    fn is_open(&self) -> bool;

    /// Number of received bytes waiting to be read
    fn bytes_to_read(&mut self) -> Result<usize, TransportError>;

    /// Read up to `buf.len()` bytes, returning how many were read
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Write the whole buffer
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Discard anything pending in either direction
    fn clear_buffers(&mut self) -> Result<(), TransportError>;

    /// Read everything currently available
    fn read_available(&mut self) -> Result<Vec<u8>, TransportError> {
        let available = self.bytes_to_read()?;
        if available == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; available];
        let n = self.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}
