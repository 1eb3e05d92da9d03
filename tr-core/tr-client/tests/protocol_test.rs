use std::time::Duration;
use tr_client::{ProtocolConfig, TeensyClient, TeensyError, TransferPolicy, save_files};
use tr_model::{FileTransferItem, StorageType, TeensySettings, TeensyToken, checksum};
use tr_shared::{FakeSerialIo, SharedSerial};

fn test_config() -> ProtocolConfig {
    ProtocolConfig {
        ack_timeout: Duration::from_millis(100),
        poll_interval: Duration::from_millis(1),
        directory_timeout: Duration::from_millis(500),
        directory_poll_backoff: Duration::from_millis(1),
        handshake_wait: Duration::from_millis(10),
        failure_drain_wait: Duration::ZERO,
        upload_drain_wait: Duration::ZERO,
    }
}

fn connect() -> (FakeSerialIo, TeensyClient) {
    let fake = FakeSerialIo::new();
    let client = TeensyClient::new(SharedSerial::new(Box::new(fake.clone())), test_config());
    (fake, client)
}

fn ack() -> Vec<u8> {
    TeensyToken::Ack.to_bytes().to_vec()
}

fn fail() -> Vec<u8> {
    TeensyToken::Fail.to_bytes().to_vec()
}

fn listing(payload: &str) -> Vec<u8> {
    let mut reply = TeensyToken::StartDirectoryList.to_bytes().to_vec();
    reply.extend_from_slice(payload.as_bytes());
    reply.extend_from_slice(&TeensyToken::EndDirectoryList.to_bytes());
    reply
}

#[test_log::test]
fn test_directory_listing_end_to_end() {
    let (fake, client) = connect();
    fake.push_reply(ack());
    fake.push_reply(listing(
        r#"[Dir]{"Name":"games","Path":"/games"}[/Dir][File]{"Name":"a.sid","Path":"/music//a.sid"}[/File]"#,
    ));

    let content = client
        .get_directory("/", 0, 20, &TeensySettings::default())
        .unwrap();

    assert_eq!(content.path, "/");
    assert_eq!(content.directories.len(), 1);
    assert_eq!(content.directories[0].name, "games");
    assert_eq!(content.files.len(), 1);
    assert_eq!(content.files[0].path, "/music/a.sid");

    // token, storage, skip, take, path
    let mut expected = vec![0x64, 0xDD, 0x01, 0x00, 0x00, 0x00, 0x14];
    expected.extend_from_slice(b"/\0");
    assert_eq!(fake.written_bytes(), expected);
}

#[test_log::test]
fn test_directory_fail_token_yields_none() {
    let (fake, client) = connect();
    fake.push_reply(ack());
    let mut reply = TeensyToken::StartDirectoryList.to_bytes().to_vec();
    reply.extend_from_slice(br#"[Dir]{"Name":"#);
    reply.extend_from_slice(&fail());
    fake.push_reply(reply);

    let settings = TeensySettings::default();
    assert!(client.get_directory("/games", 0, 20, &settings).is_none());

    let err = {
        fake.push_reply(ack());
        fake.push_reply(fail());
        client.try_get_directory("/games", 0, 20, &settings).unwrap_err()
    };
    assert_eq!(
        err,
        TeensyError::UnexpectedToken {
            expected: TeensyToken::StartDirectoryList,
            received: TeensyToken::Fail,
        }
    );
}

#[test_log::test]
fn test_directory_refused_request() {
    let (fake, client) = connect();
    fake.push_reply(fail());

    let err = client
        .try_get_directory("/", 0, 20, &TeensySettings::default())
        .unwrap_err();
    assert!(matches!(err, TeensyError::Ack { .. }));
    // Nothing past the token goes out once the device refuses it.
    assert_eq!(fake.written_bytes(), vec![0x64, 0xDD]);
}

#[test_log::test]
fn test_launch_without_second_ack_fails_and_resumes_auto_read() {
    let (fake, client) = connect();
    let _device_output = client.serial().start_auto_read(Duration::from_millis(5));
    fake.push_reply(ack());

    let settings = TeensySettings::default();
    assert!(!client.launch_file("/games/a.prg", &settings));
    assert!(client.serial().is_auto_read_enabled());

    let err = client.try_launch_file("/games/a.prg", &settings).unwrap_err();
    assert!(matches!(
        err,
        TeensyError::Ack {
            response: tr_client::AckResponse::Timeout,
            ..
        }
    ));
    assert!(client.serial().is_auto_read_enabled());

    client.serial().stop_auto_read();
}

#[test_log::test]
fn test_launch_sends_storage_and_unix_path() {
    let (fake, client) = connect();
    fake.push_reply(ack());
    fake.push_reply(ack());

    let settings = TeensySettings {
        storage_type: StorageType::Usb,
        ..Default::default()
    };
    assert!(client.launch_file(r"\games\a.prg", &settings));

    let mut expected = vec![0x64, 0x44, 0x00];
    expected.extend_from_slice(b"/games/a.prg\0");
    assert_eq!(fake.written_bytes(), expected);
}

#[test_log::test]
fn test_save_uses_settings_target_and_checksum() {
    let (fake, client) = connect();
    for _ in 0..3 {
        fake.push_reply(ack());
    }

    let body: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let item = FileTransferItem::from_bytes("a.sid", body.clone(), "/", StorageType::Sd).unwrap();
    assert_eq!(item.checksum(), checksum(&body));

    let destination = client
        .try_save_file(&item, &TeensySettings::default())
        .unwrap();
    assert_eq!(destination, "/music/a.sid");

    let written = fake.written_bytes();
    let sum = checksum(&body).to_be_bytes();
    let mut header = vec![0x64, 0xBB, 0x00, 0x00, 0x03, 0xE8, sum[0], sum[1], 0x01];
    header.extend_from_slice(b"/music/a.sid\0");
    assert!(written.starts_with(&header));
    assert!(written.ends_with(&body));
}

#[test_log::test]
fn test_save_rejects_unconfigured_file_type() {
    let (fake, client) = connect();
    let item = FileTransferItem::from_bytes("notes.zip", vec![1], "/", StorageType::Sd).unwrap();

    let settings = TeensySettings::default();
    assert!(!client.save_file(&item, &settings));
    assert!(fake.writes().is_empty());
}

#[test_log::test]
fn test_copy_and_delete_layout() {
    let (fake, client) = connect();
    for _ in 0..4 {
        fake.push_reply(ack());
    }
    let settings = TeensySettings::default();

    assert!(client.copy_file("/music/a.sid", "/fav/a.sid", &settings));
    assert!(client.delete_file("/music/a.sid", &settings));

    let mut expected = vec![0x64, 0xFF, 0x01];
    expected.extend_from_slice(b"/music/a.sid\0/fav/a.sid\0");
    expected.extend_from_slice(&[0x64, 0xCF, 0x01]);
    expected.extend_from_slice(b"/music/a.sid\0");
    assert_eq!(fake.written_bytes(), expected);
}

#[test_log::test]
fn test_toggle_music() {
    let (fake, client) = connect();
    fake.push_reply(ack());
    assert!(client.toggle_music());
    assert!(!client.toggle_music());
    assert_eq!(fake.written_bytes(), vec![0x64, 0x66, 0x64, 0x66]);
}

#[test_log::test]
fn test_ping_on_closed_port_is_ignored() {
    let (fake, client) = connect();
    fake.set_open(false);
    client.ping().unwrap();
    client.reset().unwrap();
    assert!(fake.writes().is_empty());
}

#[test_log::test]
fn test_save_files_overwrites_existing_file() {
    let (fake, client) = connect();
    // First attempt: the device refuses the metadata because the file exists.
    fake.push_reply(ack());
    let mut refused = fail();
    refused.extend_from_slice(b"File already exists\r\n");
    fake.push_reply(refused);
    // Delete.
    fake.push_reply(ack());
    fake.push_reply(ack());
    // Second attempt.
    for _ in 0..3 {
        fake.push_reply(ack());
    }

    let item = FileTransferItem::from_bytes("a.sid", vec![7; 32], "/music", StorageType::Sd).unwrap();
    let policy = TransferPolicy {
        retry_limit: 3,
        retry_backoff: Duration::from_millis(1),
    };
    let result = save_files(&client, vec![item], &policy);

    assert!(result.all_succeeded());
    assert_eq!(result.successful.len(), 1);
    assert_eq!(fake.staged_reply_count(), 0);

    let written = fake.written_bytes();
    let delete = {
        let mut d = vec![0x64, 0xCF, 0x01];
        d.extend_from_slice(b"/music/a.sid\0");
        d
    };
    assert!(written.windows(delete.len()).any(|w| w == delete.as_slice()));
}

#[test_log::test]
fn test_save_files_gives_up_after_retry_limit() {
    let (fake, client) = connect();
    for _ in 0..3 {
        fake.push_reply(fail());
    }

    let good = FileTransferItem::from_bytes("b.prg", vec![1; 4], "/games", StorageType::Sd).unwrap();
    let policy = TransferPolicy {
        retry_limit: 3,
        retry_backoff: Duration::from_millis(1),
    };
    let result = save_files(&client, vec![good], &policy);

    assert!(!result.all_succeeded());
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].name(), "b.prg");
    // Three attempts, each stopped right after the token.
    assert_eq!(fake.written_bytes(), [0x64u8, 0xBB].repeat(3));
}
