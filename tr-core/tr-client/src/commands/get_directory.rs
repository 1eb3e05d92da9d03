//! List a directory on cartridge storage

use crate::command::CommandContext;
use crate::decode::{RawDirectory, accumulate_directory_bytes, decode_directory};
use crate::error::TeensyError;
use tr_model::path::to_unix_path;
use tr_model::{DirectoryContent, IntWidth, StorageType, TeensyToken};

/// Request up to `take` entries of `path`, skipping the first `skip`
///
/// The returned content records the requested path, not anything the
/// firmware echoes back.
pub fn get_directory(
    ctx: &mut CommandContext<'_>,
    path: &str,
    storage: StorageType,
    skip: u16,
    take: u16,
) -> Result<DirectoryContent, TeensyError> {
    let path = to_unix_path(path);
    let drain_wait = ctx.config().failure_drain_wait;

    ctx.send_token(TeensyToken::ListDirectory)?;
    ctx.expect_ack("list directory token sent", drain_wait)?;

    ctx.send_storage(storage)?;
    ctx.send_int(u32::from(skip), IntWidth::Two)?;
    ctx.send_int(u32::from(take), IntWidth::Two)?;
    ctx.send_path(&path)?;

    match ctx.read_token()? {
        Some(TeensyToken::StartDirectoryList) => {}
        Some(received) => {
            ctx.read_serial_as_string(drain_wait);
            return Err(TeensyError::UnexpectedToken {
                expected: TeensyToken::StartDirectoryList,
                received,
            });
        }
        None => {
            return Err(TeensyError::Timeout {
                context: "directory start token",
                waited: ctx.config().ack_timeout,
            });
        }
    }

    let timeout = ctx.config().directory_timeout;
    let backoff = ctx.config().directory_poll_backoff;
    let raw = match accumulate_directory_bytes(ctx.io(), timeout, backoff)? {
        RawDirectory::Complete(raw) => raw,
        RawDirectory::Failed(partial) => {
            log::debug!("Discarding {} byte(s) of a failed listing", partial.len());
            return Err(TeensyError::UnexpectedToken {
                expected: TeensyToken::EndDirectoryList,
                received: TeensyToken::Fail,
            });
        }
    };

    let content = decode_directory(&raw, &path)?;
    log::debug!(
        "Listed {storage}:{path}: {} director(ies), {} file(s)",
        content.directories.len(),
        content.files.len()
    );
    Ok(content)
}
