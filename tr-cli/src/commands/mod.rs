//! Subcommand handlers

pub mod device;
pub mod files;
pub mod launch;
pub mod ls;
pub mod ports;
pub mod save;

use crate::cli::{Cli, Command};
use crate::config::load_settings;
use crate::connect::connect;
use anyhow::{Context, Result};
use tr_client::{AsyncTeensyClient, ProtocolConfig};
use tr_model::TeensySettings;

/// A connected cartridge plus the settings snapshot for this invocation
pub struct Session {
    pub client: AsyncTeensyClient,
    pub settings: TeensySettings,
    pub port: String,
}

/// Dispatch the parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.settings.as_deref(), cli.storage.map(Into::into))?;

    if let Command::Ports = cli.command {
        return ports::handle_ports(&settings);
    }

    let port = cli.port.clone();
    let baud = cli.baud;
    let connect_settings = settings.clone();
    let (client, port) = tokio::task::spawn_blocking(move || {
        connect(port.as_deref(), baud, &connect_settings, ProtocolConfig::default())
    })
    .await
    .context("Connection task failed")??;

    let session = Session {
        client: AsyncTeensyClient::new(client),
        settings,
        port,
    };

    match cli.command {
        Command::Ports => Ok(()),
        Command::Ping => device::handle_ping(&session).await,
        Command::Reset => device::handle_reset(&session).await,
        Command::ToggleMusic => device::handle_toggle_music(&session).await,
        Command::Ls {
            path,
            skip,
            take,
            json,
        } => ls::handle_ls(&session, path, skip, take, json).await,
        Command::Launch { path } => launch::handle_launch(&session, path).await,
        Command::Save { files, to } => save::handle_save(&session, files, to).await,
        Command::Copy {
            source,
            destination,
        } => files::handle_copy(&session, source, destination).await,
        Command::Rm { path } => files::handle_rm(&session, path).await,
    }
}
