//! Directory listing payload
//!
//! The firmware streams a listing as bracketed chunks with embedded JSON,
//! terminated by the `EndDirectoryList` token:
//!
//! ```text
//! [Dir]{"Name":"games","Path":"/games"}[/Dir][File]{"Name":"a.sid","Path":"/music//a.sid","Size":1024}[/File]<A5 A5>
//! ```
//!
//! [`accumulate_directory_bytes`] reads the payload off the transport;
//! [`decode_directory`] turns it into typed entries without touching I/O.

use crate::error::TeensyError;
use std::thread;
use std::time::{Duration, Instant};
use tr_model::{DirectoryContent, DirectoryItem, FileItem, TeensyToken};
use tr_shared::SerialIo;

const DIR_TOKEN: &str = "[Dir]";
const DIR_END_TOKEN: &str = "[/Dir]";
const FILE_TOKEN: &str = "[File]";
const FILE_END_TOKEN: &str = "[/File]";

/// Single non-overlapping pass, so `///` becomes `//`
fn collapse_double_slash(path: &str) -> String {
    path.replace("//", "/")
}

/// Raw bytes collected for one listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDirectory {
    /// Ended with the end-of-list token, which is included
    Complete(Vec<u8>),
    /// The device sent the fail token; bytes up to and including it
    Failed(Vec<u8>),
}

fn last_token(bytes: &[u8]) -> Option<TeensyToken> {
    match bytes {
        [.., hi, lo] => Some(TeensyToken::from_bytes([*hi, *lo])),
        _ => None,
    }
}

/// Collect listing bytes until the end or fail token, or until `timeout`
///
/// Reads one byte at a time so nothing past the terminating token is consumed.
/// When no bytes are waiting it sleeps for `backoff`.
pub fn accumulate_directory_bytes(
    io: &mut dyn SerialIo,
    timeout: Duration,
    backoff: Duration,
) -> Result<RawDirectory, TeensyError> {
    let start = Instant::now();
    let mut received = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if start.elapsed() > timeout {
            log::warn!(
                "Directory listing timed out after {} byte(s): {}",
                received.len(),
                String::from_utf8_lossy(&received)
            );
            return Err(TeensyError::Timeout {
                context: "directory content",
                waited: timeout,
            });
        }

        if io.bytes_to_read()? == 0 {
            thread::sleep(backoff);
            continue;
        }
        if io.read(&mut byte)? == 0 {
            continue;
        }
        received.push(byte[0]);

        match last_token(&received) {
            Some(TeensyToken::Fail) => {
                log::warn!("Received fail token while receiving directory content");
                return Ok(RawDirectory::Failed(received));
            }
            Some(TeensyToken::EndDirectoryList) => return Ok(RawDirectory::Complete(received)),
            _ => {}
        }
    }
}

/// Decode a listing payload into directory content
///
/// `raw` may still carry the trailing end-of-list token. Each `//` in an
/// entry path becomes `/`. A `null` entry is skipped; one malformed chunk
/// fails the whole listing.
///
/// # Arguments
/// * `raw` - accumulated payload bytes
/// * `path` - the path that was requested, recorded on the result
pub fn decode_directory(raw: &[u8], path: &str) -> Result<DirectoryContent, TeensyError> {
    let payload = match last_token(raw) {
        Some(TeensyToken::EndDirectoryList) => &raw[..raw.len() - 2],
        _ => raw,
    };
    let data = String::from_utf8_lossy(payload).replace(FILE_END_TOKEN, DIR_END_TOKEN);

    let mut content = DirectoryContent {
        path: path.to_string(),
        ..Default::default()
    };

    for chunk in data.split(DIR_END_TOKEN).filter(|c| !c.is_empty()) {
        if let Some(json) = chunk.strip_prefix(DIR_TOKEN) {
            let item: Option<DirectoryItem> = serde_json::from_str(json)
                .map_err(|e| TeensyError::Decode(format!("{e} in {chunk}")))?;
            if let Some(mut item) = item {
                item.path = collapse_double_slash(&item.path);
                content.directories.push(item);
            }
        } else if let Some(json) = chunk.strip_prefix(FILE_TOKEN) {
            let item: Option<FileItem> = serde_json::from_str(json)
                .map_err(|e| TeensyError::Decode(format!("{e} in {chunk}")))?;
            if let Some(mut item) = item {
                item.path = collapse_double_slash(&item.path);
                content.files.push(item);
            }
        }
    }
    Ok(content)
}
