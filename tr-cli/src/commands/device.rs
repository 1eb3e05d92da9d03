//! Ping, reset and music toggle

use super::Session;
use crate::messages::print_success;
use anyhow::{Result, bail};
use tr_client::{DeviceResponse, verify_device};

pub async fn handle_ping(session: &Session) -> Result<()> {
    let client = session.client.blocking().clone();
    let response = tokio::task::spawn_blocking(move || verify_device(client.serial(), client.config())).await??;

    match response {
        DeviceResponse::NotTeensy => bail!("{} did not answer like a TeensyROM", session.port),
        DeviceResponse::Ready => print_success(&format!("TeensyROM ready on {}", session.port), &[]),
        DeviceResponse::Busy => print_success(
            &format!("TeensyROM on {} is busy", session.port),
            &["Return the C64 to the TeensyROM menu and try again"],
        ),
        DeviceResponse::Minimal => print_success(
            &format!("TeensyROM on {} is running minimal firmware", session.port),
            &[],
        ),
    }
    Ok(())
}

pub async fn handle_reset(session: &Session) -> Result<()> {
    session.client.reset().await?;
    print_success("Reset sent", &[]);
    Ok(())
}

pub async fn handle_toggle_music(session: &Session) -> Result<()> {
    session.client.toggle_music().await?;
    print_success("Music toggled", &[]);
    Ok(())
}
