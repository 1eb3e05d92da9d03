use super::Session;
use crate::messages::print_success;
use anyhow::{Result, bail};
use tr_model::TeensyFileType;

pub async fn handle_launch(session: &Session, path: String) -> Result<()> {
    let file_type = TeensyFileType::from_path(&path);
    if !file_type.is_launchable() {
        bail!("{path} is not a launchable file type ({file_type:?})");
    }

    session
        .client
        .launch_file(path.clone(), session.settings.clone())
        .await?;
    print_success(&format!("Launched {path}"), &[]);
    Ok(())
}
