//! `serialport` backed transport

use super::{SerialIo, TransportError};
use serialport::{ClearBuffer, SerialPort};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

/// Default TeensyROM baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// A real serial port
pub struct SerialPortIo {
    port: Box<dyn SerialPort>,
    name: String,
    open: bool,
}

impl SerialPortIo {
    /// Open a serial port
    ///
    /// # Arguments
    /// * `port_name` - e.g. `/dev/ttyACM0` or `COM3`
    /// * `baud_rate` - usually [`DEFAULT_BAUD_RATE`]
    /// * `timeout` - per-call read/write timeout of the underlying port
    pub fn open(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self, TransportError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| TransportError::Io(format!("Failed to open serial port {port_name}: {e}")))?;

        log::debug!("Opened {port_name} @ {baud_rate} baud");

        Ok(Self {
            port,
            name: port_name.to_string(),
            open: true,
        })
    }

    /// Names of the serial ports present on this machine
    pub fn available_ports() -> Result<Vec<String>, TransportError> {
        let ports = serialport::available_ports()
            .map_err(|e| TransportError::Io(format!("Failed to list serial ports: {e}")))?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }

    fn map_io(&mut self, e: std::io::Error) -> TransportError {
        match e.kind() {
            ErrorKind::BrokenPipe | ErrorKind::NotConnected | ErrorKind::UnexpectedEof => {
                self.open = false;
                TransportError::ConnectionLost
            }
            _ => TransportError::Io(e.to_string()),
        }
    }
}

impl SerialIo for SerialPortIo {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn bytes_to_read(&mut self) -> Result<usize, TransportError> {
        match self.port.bytes_to_read() {
            Ok(n) => Ok(n as usize),
            Err(e) => {
                self.open = false;
                Err(TransportError::Io(e.to_string()))
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(self.map_io(e)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if let Err(e) = self.port.write_all(data) {
            return Err(self.map_io(e));
        }
        self.port.flush().map_err(|e| self.map_io(e))
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        if !self.open {
            return Ok(());
        }
        self.port
            .clear(ClearBuffer::All)
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}
