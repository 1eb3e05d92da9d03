//! Copy and delete on the cartridge

use super::Session;
use crate::messages::print_success;
use anyhow::Result;

pub async fn handle_copy(session: &Session, source: String, destination: String) -> Result<()> {
    session
        .client
        .copy_file(source.clone(), destination.clone(), session.settings.clone())
        .await?;
    print_success(&format!("Copied {source} to {destination}"), &[]);
    Ok(())
}

pub async fn handle_rm(session: &Session, path: String) -> Result<()> {
    session
        .client
        .delete_file(path.clone(), session.settings.clone())
        .await?;
    print_success(&format!("Deleted {path}"), &[]);
    Ok(())
}
