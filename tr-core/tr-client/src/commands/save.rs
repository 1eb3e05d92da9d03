//! Upload a file to cartridge storage

use crate::command::CommandContext;
use crate::error::TeensyError;
use tr_model::path::to_unix_path;
use tr_model::{FileTransferItem, IntWidth, StorageType, TeensyToken};

/// Bytes written per chunk while streaming a file body
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Upload `item` to `destination` on `storage`
///
/// The header carries the 4-byte length, 2-byte checksum, storage byte and
/// the null-terminated destination. The body follows in [`CHUNK_SIZE`] writes
/// and the firmware acks once the whole file is stored.
pub fn save_file(
    ctx: &mut CommandContext<'_>,
    item: &FileTransferItem,
    destination: &str,
    storage: StorageType,
) -> Result<(), TeensyError> {
    let destination = to_unix_path(destination);
    let drain_wait = ctx.config().failure_drain_wait;
    let upload_drain_wait = ctx.config().upload_drain_wait;

    ctx.send_token(TeensyToken::PostFile)?;
    ctx.expect_ack("send file token sent", drain_wait)?;

    ctx.send_int(item.stream_length(), IntWidth::Four)?;
    ctx.send_int(u32::from(item.checksum()), IntWidth::Two)?;
    ctx.send_storage(storage)?;
    ctx.send_path(&destination)?;
    ctx.expect_ack("file metadata sent", drain_wait)?;

    let mut sent = 0;
    for chunk in item.buffer().chunks(CHUNK_SIZE) {
        ctx.write_bytes(chunk)?;
        sent += chunk.len();
        log::trace!("{destination}: {sent}/{} bytes", item.stream_length());
    }

    if let Err(e) = ctx.expect_ack("sending file", upload_drain_wait) {
        log::warn!("File transfer failed: {destination}");
        return Err(e);
    }

    log::info!("Saved {} bytes to {storage}:{destination}", item.stream_length());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::fast_config;
    use tr_shared::{FakeSerialIo, SharedSerial};

    fn ack() -> Vec<u8> {
        TeensyToken::Ack.to_bytes().to_vec()
    }

    #[test_log::test]
    fn test_body_is_chunked() {
        let fake = FakeSerialIo::new();
        let serial = SharedSerial::new(Box::new(fake.clone()));
        let config = fast_config();
        for _ in 0..3 {
            fake.push_reply(ack());
        }

        let body: Vec<u8> = (0..CHUNK_SIZE * 2 + 100).map(|i| i as u8).collect();
        let item = FileTransferItem::from_bytes("big.prg", body.clone(), "/games", StorageType::Sd).unwrap();

        let mut ctx = CommandContext::new(serial.lease().unwrap(), &config);
        save_file(&mut ctx, &item, "/games/big.prg", StorageType::Sd).unwrap();

        let chunk_writes: Vec<usize> = fake
            .writes()
            .iter()
            .rev()
            .take(3)
            .map(Vec::len)
            .collect();
        assert_eq!(chunk_writes, vec![100, CHUNK_SIZE, CHUNK_SIZE]);
        assert!(fake.written_bytes().ends_with(&body));
    }

    #[test_log::test]
    fn test_header_layout() {
        let fake = FakeSerialIo::new();
        let serial = SharedSerial::new(Box::new(fake.clone()));
        let config = fast_config();
        for _ in 0..3 {
            fake.push_reply(ack());
        }

        let item = FileTransferItem::from_bytes("a.sid", vec![1, 2, 3], "/music", StorageType::Usb).unwrap();
        let mut ctx = CommandContext::new(serial.lease().unwrap(), &config);
        save_file(&mut ctx, &item, "/music/a.sid", StorageType::Usb).unwrap();

        let mut expected = vec![0x64, 0xBB, 0, 0, 0, 3, 0, 6, 0];
        expected.extend_from_slice(b"/music/a.sid\0");
        expected.extend_from_slice(&[1, 2, 3]);
        assert_eq!(fake.written_bytes(), expected);
    }

    #[test_log::test]
    fn test_refused_metadata_stops_before_body() {
        let fake = FakeSerialIo::new();
        let serial = SharedSerial::new(Box::new(fake.clone()));
        let config = fast_config();
        fake.push_reply(ack());
        fake.push_reply(TeensyToken::Fail.to_bytes().to_vec());

        let item = FileTransferItem::from_bytes("a.sid", vec![9; 10], "/music", StorageType::Sd).unwrap();
        let mut ctx = CommandContext::new(serial.lease().unwrap(), &config);
        let err = save_file(&mut ctx, &item, "/music/a.sid", StorageType::Sd).unwrap_err();

        assert!(matches!(
            err,
            TeensyError::Ack {
                phase: "file metadata sent",
                ..
            }
        ));
        assert!(!fake.written_bytes().ends_with(&[9; 10]));
    }
}
