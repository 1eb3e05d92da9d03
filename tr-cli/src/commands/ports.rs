use crate::messages::print_success;
use anyhow::Result;
use tr_client::sorted_ports;
use tr_model::TeensySettings;
use tr_shared::SerialPortIo;

pub fn handle_ports(settings: &TeensySettings) -> Result<()> {
    let available = SerialPortIo::available_ports()?;
    if available.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    for port in sorted_ports(&available, &settings.known_ports) {
        if settings.known_ports.contains(&port) {
            println!("{port} (known)");
        } else {
            println!("{port}");
        }
    }
    print_success(
        &format!("{} port(s)", available.len()),
        &["teensyrom --port <PORT> ping"],
    );
    Ok(())
}
