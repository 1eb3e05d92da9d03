//! Opening a connection to the cartridge

use anyhow::{Context, Result, bail};
use std::time::Duration;
use tr_client::{ProtocolConfig, TeensyClient, connect_first, sorted_ports};
use tr_model::TeensySettings;
use tr_shared::{SerialIo, SerialPortIo, SharedSerial};

/// Per-call timeout of the OS serial handle; commands enforce their own deadlines
const PORT_TIMEOUT: Duration = Duration::from_millis(50);

/// Connect to `port`, or to the first port a cartridge answers on
///
/// # Returns
/// * The client and the name of the port it is connected to
pub fn connect(
    port: Option<&str>,
    baud: u32,
    settings: &TeensySettings,
    config: ProtocolConfig,
) -> Result<(TeensyClient, String)> {
    if let Some(port) = port {
        let io = SerialPortIo::open(port, baud, PORT_TIMEOUT)
            .with_context(|| format!("Failed to connect to {port}"))?;
        return Ok((TeensyClient::new(SharedSerial::new(Box::new(io)), config), port.to_string()));
    }

    let available = SerialPortIo::available_ports()?;
    if available.is_empty() {
        bail!("No serial ports found");
    }
    let candidates = sorted_ports(&available, &settings.known_ports);
    log::debug!("Probing ports: {}", candidates.join(", "));

    let open = |name: &str| -> Result<Box<dyn SerialIo>, tr_shared::TransportError> {
        Ok(Box::new(SerialPortIo::open(name, baud, PORT_TIMEOUT)?))
    };
    match connect_first(&candidates, open, &config) {
        Some((serial, response)) => {
            let name = serial.name().to_string();
            log::info!("Connected to {name} ({response:?})");
            Ok((TeensyClient::new(serial, config), name))
        }
        None => bail!("No TeensyROM found on {}", candidates.join(", ")),
    }
}
