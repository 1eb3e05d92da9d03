//! Copy a file within cartridge storage

use crate::command::CommandContext;
use crate::error::TeensyError;
use tr_model::path::to_unix_path;
use tr_model::{StorageType, TeensyToken};

pub fn copy_file(
    ctx: &mut CommandContext<'_>,
    source: &str,
    destination: &str,
    storage: StorageType,
) -> Result<(), TeensyError> {
    let drain_wait = ctx.config().failure_drain_wait;

    ctx.send_token(TeensyToken::CopyFile)?;
    ctx.expect_ack("copy file token sent", drain_wait)?;

    ctx.send_storage(storage)?;
    ctx.send_path(&to_unix_path(source))?;
    ctx.send_path(&to_unix_path(destination))?;
    ctx.expect_ack("copy file paths sent", drain_wait)?;

    log::info!("Copied {source} to {destination}");
    Ok(())
}
