//! Launch a file on the cartridge

use crate::command::CommandContext;
use crate::error::TeensyError;
use tr_model::path::to_unix_path;
use tr_model::{StorageType, TeensyToken};

/// Launch `path` from `storage`
///
/// Token, ack, storage byte, null-terminated path, ack.
pub fn launch_file(
    ctx: &mut CommandContext<'_>,
    path: &str,
    storage: StorageType,
) -> Result<(), TeensyError> {
    let path = to_unix_path(path);
    let drain_wait = ctx.config().failure_drain_wait;

    ctx.send_token(TeensyToken::LaunchFile)?;
    ctx.expect_ack("launch file token sent", drain_wait)?;

    ctx.send_storage(storage)?;
    ctx.send_path(&path)?;
    ctx.expect_ack("launch file path sent", drain_wait)?;

    log::info!("Launched {storage}:{path}");
    Ok(())
}
