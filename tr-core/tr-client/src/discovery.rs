//! Find a cartridge among the machine's serial ports

use crate::command::CommandContext;
use crate::commands;
use crate::config::ProtocolConfig;
use crate::error::TeensyError;
use tr_shared::{SerialIo, SharedSerial, TransportError};

/// How a port answered a ping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceResponse {
    /// Normal firmware banner
    Ready,
    /// A cartridge that is running something and cannot take commands yet
    Busy,
    /// Minimal (recovery) firmware
    Minimal,
    /// Something else answered, or nothing did
    NotTeensy,
}

impl DeviceResponse {
    pub fn is_teensy(self) -> bool {
        self != DeviceResponse::NotTeensy
    }
}

/// Classify the text a port sent back after a ping
pub fn classify_response(text: &str) -> DeviceResponse {
    let text = text.to_ascii_lowercase();
    if text.contains("minimal") {
        DeviceResponse::Minimal
    } else if text.contains("busy") {
        DeviceResponse::Busy
    } else if text.contains("teensyrom") {
        DeviceResponse::Ready
    } else {
        DeviceResponse::NotTeensy
    }
}

/// Order candidate ports: previously seen ports first, then the rest by name
pub fn sorted_ports(available: &[String], known: &[String]) -> Vec<String> {
    let mut ports = available.to_vec();
    ports.sort();
    ports.dedup();
    ports.sort_by_key(|p| !known.contains(p));
    ports
}

/// Ping the device and classify its banner
pub fn verify_device(serial: &SharedSerial, config: &ProtocolConfig) -> Result<DeviceResponse, TeensyError> {
    let lease = serial.lease()?;
    let mut ctx = CommandContext::new(lease, config);
    commands::send_ping(&mut ctx)?;
    let text = ctx.read_serial_as_string(config.handshake_wait);

    let response = classify_response(&text);
    log::debug!("{}: ping answered as {response:?}", serial.name());
    Ok(response)
}

/// Open each port in turn and return the first one a cartridge answers on
///
/// # Arguments
/// * `ports` - candidates, already ordered (see [`sorted_ports`])
/// * `open` - opens a port by name
pub fn connect_first<F>(
    ports: &[String],
    mut open: F,
    config: &ProtocolConfig,
) -> Option<(SharedSerial, DeviceResponse)>
where
    F: FnMut(&str) -> Result<Box<dyn SerialIo>, TransportError>,
{
    for port in ports {
        let io = match open(port) {
            Ok(io) => io,
            Err(e) => {
                log::warn!("Unable to connect to {port}: {e}");
                continue;
            }
        };

        let serial = SharedSerial::new(io);
        match verify_device(&serial, config) {
            Ok(response) if response.is_teensy() => {
                log::info!("Found TeensyROM on {port} ({response:?})");
                return Some((serial, response));
            }
            Ok(_) => log::debug!("{port} is not a TeensyROM"),
            Err(e) => log::warn!("Handshake on {port} failed: {e}"),
        }
    }
    None
}
