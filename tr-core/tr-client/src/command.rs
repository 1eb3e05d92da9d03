//! Per-command exchange context and wire helpers
//!
//! A [`CommandContext`] owns the [`SerialLease`] for the length of one command,
//! so the background reader stays paused until the context is dropped.

use crate::config::ProtocolConfig;
use crate::error::TeensyError;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use tr_model::{IntWidth, StorageType, TeensyToken, decode_int, encode_int};
use tr_shared::{SerialIo, SerialLease};

/// Classified reply to a protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckResponse {
    Ack,
    Fail,
    /// Two bytes arrived but they were not an ack or fail token
    Unexpected(u16),
    /// Fewer than two bytes arrived in time
    Timeout,
}

impl AckResponse {
    pub fn is_ack(self) -> bool {
        self == AckResponse::Ack
    }
}

impl fmt::Display for AckResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckResponse::Ack => write!(f, "acknowledged"),
            AckResponse::Fail => write!(f, "failure token received"),
            AckResponse::Unexpected(value) => write!(f, "unexpected response 0x{value:04X}"),
            AckResponse::Timeout => write!(f, "no response"),
        }
    }
}

/// Exclusive exchange with the cartridge for one command
pub struct CommandContext<'a> {
    io: SerialLease<'a>,
    config: &'a ProtocolConfig,
}

impl<'a> CommandContext<'a> {
    pub fn new(io: SerialLease<'a>, config: &'a ProtocolConfig) -> Self {
        Self { io, config }
    }

    pub fn config(&self) -> &ProtocolConfig {
        self.config
    }

    /// Raw access to the leased transport
    pub fn io(&mut self) -> &mut dyn SerialIo {
        &mut *self.io
    }

    pub fn is_open(&self) -> bool {
        self.io.is_open()
    }

    /// Poll until `num_bytes` are waiting or `timeout` passes
    ///
    /// # Returns
    /// * `true` if enough bytes arrived, `false` on timeout or a transport failure
    pub fn wait_for_serial_data(&mut self, num_bytes: usize, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            match self.io.bytes_to_read() {
                Ok(available) if available >= num_bytes => return true,
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Waiting for {num_bytes} byte(s) failed: {e}");
                    return false;
                }
            }
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(self.config.poll_interval);
        }
    }

    /// Read exactly `buf.len()` bytes that are already known to be available
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TeensyError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.io.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(TeensyError::Timeout {
                    context: "serial data",
                    waited: self.config.ack_timeout,
                });
            }
            filled += n;
        }
        Ok(())
    }

    /// Wait for and read a 2-byte control value
    ///
    /// Returns `None` when it did not arrive within `ack_timeout`.
    pub fn read_token(&mut self) -> Result<Option<TeensyToken>, TeensyError> {
        if !self.wait_for_serial_data(2, self.config.ack_timeout) {
            return Ok(None);
        }
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(Some(TeensyToken::from_bytes(buf)))
    }

    /// Read and classify the reply to the previous phase
    pub fn read_ack(&mut self) -> AckResponse {
        let response = match self.read_token() {
            Ok(Some(TeensyToken::Ack)) => AckResponse::Ack,
            Ok(Some(TeensyToken::Fail)) => AckResponse::Fail,
            Ok(Some(other)) => AckResponse::Unexpected(other.value()),
            Ok(None) => AckResponse::Timeout,
            Err(e) => {
                log::warn!("Reading acknowledgement failed: {e}");
                AckResponse::Timeout
            }
        };

        match response {
            AckResponse::Ack => log::debug!("Response: acknowledgement token received"),
            AckResponse::Fail => log::warn!("Response: acknowledgement failure received"),
            AckResponse::Unexpected(value) => log::warn!(
                "Response: unexpected response that was not an ack token - {:02X}:{:02X}",
                value >> 8,
                value & 0xFF
            ),
            AckResponse::Timeout => log::warn!(
                "Response: timed out after {:?} waiting for acknowledgement",
                self.config.ack_timeout
            ),
        }
        response
    }

    /// `true` iff the next two bytes are the ack token
    pub fn get_ack(&mut self) -> bool {
        self.read_ack().is_ack()
    }

    /// Require an ack, draining the device's explanation on refusal
    ///
    /// # Arguments
    /// * `phase` - what was just sent, used in the error message
    /// * `drain_wait` - how long to let the device finish printing before draining
    pub fn expect_ack(&mut self, phase: &'static str, drain_wait: Duration) -> Result<(), TeensyError> {
        let response = self.read_ack();
        if response.is_ack() {
            return Ok(());
        }
        let device_output = self.read_serial_as_string(drain_wait);
        Err(TeensyError::Ack {
            phase,
            response,
            device_output,
        })
    }

    /// Sleep for `wait`, then drain and log whatever the device has sent
    pub fn read_serial_as_string(&mut self, wait: Duration) -> String {
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        match self.io.read_available() {
            Ok(bytes) if bytes.is_empty() => String::new(),
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                if text.trim().is_empty() {
                    return String::new();
                }
                log::info!("Received string: {}", text.trim_end());
                text
            }
            Err(e) => {
                log::warn!("Draining device output failed: {e}");
                String::new()
            }
        }
    }

    /// Send the low `width` bytes of `value`, most significant first
    pub fn send_int(&mut self, value: u32, width: IntWidth) -> Result<(), TeensyError> {
        self.io.write_all(&encode_int(value, width))?;
        Ok(())
    }

    /// Read a big-endian integer of `width` bytes within `ack_timeout`
    pub fn read_int(&mut self, width: IntWidth) -> Result<u32, TeensyError> {
        let len = width.bytes();
        if !self.wait_for_serial_data(len, self.config.ack_timeout) {
            return Err(TeensyError::Timeout {
                context: "integer field",
                waited: self.config.ack_timeout,
            });
        }
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf[..len])?;
        decode_int(&buf[..len]).ok_or_else(|| TeensyError::Decode(format!("Invalid {len}-byte integer")))
    }

    pub fn send_token(&mut self, token: TeensyToken) -> Result<(), TeensyError> {
        log::trace!("Sending {token}");
        self.io.write_all(&token.to_bytes())?;
        Ok(())
    }

    pub fn send_storage(&mut self, storage: StorageType) -> Result<(), TeensyError> {
        self.send_int(u32::from(storage.token()), IntWidth::One)
    }

    /// Send a path as null-terminated ASCII
    pub fn send_path(&mut self, path: &str) -> Result<(), TeensyError> {
        let mut bytes = Vec::with_capacity(path.len() + 1);
        bytes.extend_from_slice(path.as_bytes());
        bytes.push(0);
        self.io.write_all(&bytes)?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TeensyError> {
        self.io.write_all(bytes)?;
        Ok(())
    }
}
