//! Delete a file from cartridge storage

use crate::command::CommandContext;
use crate::error::TeensyError;
use tr_model::path::to_unix_path;
use tr_model::{StorageType, TeensyToken};

pub fn delete_file(
    ctx: &mut CommandContext<'_>,
    path: &str,
    storage: StorageType,
) -> Result<(), TeensyError> {
    let path = to_unix_path(path);
    let drain_wait = ctx.config().failure_drain_wait;

    ctx.send_token(TeensyToken::DeleteFile)?;
    ctx.expect_ack("delete file token sent", drain_wait)?;

    ctx.send_storage(storage)?;
    ctx.send_path(&path)?;
    ctx.expect_ack("delete file path sent", drain_wait)?;

    log::info!("Deleted {storage}:{path}");
    Ok(())
}
