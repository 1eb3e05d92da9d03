//! Async wrapper over [`TeensyClient`]
//!
//! Commands block on serial I/O, so each call runs on tokio's blocking pool.

use crate::client::TeensyClient;
use crate::config::TransferPolicy;
use crate::error::TeensyError;
use crate::transfer::{SaveFilesResult, save_files};
use std::sync::Arc;
use tr_model::{DirectoryContent, FileTransferItem, TeensySettings};

#[derive(Debug, Clone)]
pub struct AsyncTeensyClient {
    inner: Arc<TeensyClient>,
}

impl AsyncTeensyClient {
    pub fn new(client: TeensyClient) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// The wrapped blocking client
    pub fn blocking(&self) -> &TeensyClient {
        &self.inner
    }

    async fn run<T, F>(&self, f: F) -> Result<T, TeensyError>
    where
        T: Send + 'static,
        F: FnOnce(&TeensyClient) -> T + Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| TeensyError::Io(format!("Background task failed: {e}")))
    }

    pub async fn ping(&self) -> Result<(), TeensyError> {
        self.run(|c| c.ping()).await?
    }

    pub async fn reset(&self) -> Result<(), TeensyError> {
        self.run(|c| c.reset()).await?
    }

    pub async fn launch_file(&self, path: String, settings: TeensySettings) -> Result<(), TeensyError> {
        self.run(move |c| c.try_launch_file(&path, &settings)).await?
    }

    pub async fn toggle_music(&self) -> Result<(), TeensyError> {
        self.run(|c| c.try_toggle_music()).await?
    }

    pub async fn copy_file(
        &self,
        source: String,
        destination: String,
        settings: TeensySettings,
    ) -> Result<(), TeensyError> {
        self.run(move |c| c.try_copy_file(&source, &destination, &settings))
            .await?
    }

    pub async fn delete_file(&self, path: String, settings: TeensySettings) -> Result<(), TeensyError> {
        self.run(move |c| c.try_delete_file(&path, settings.storage_type))
            .await?
    }

    pub async fn get_directory(
        &self,
        path: String,
        skip: u16,
        take: u16,
        settings: TeensySettings,
    ) -> Result<DirectoryContent, TeensyError> {
        self.run(move |c| c.try_get_directory(&path, skip, take, &settings))
            .await?
    }

    pub async fn save_file(
        &self,
        item: FileTransferItem,
        settings: TeensySettings,
    ) -> Result<String, TeensyError> {
        self.run(move |c| c.try_save_file(&item, &settings)).await?
    }

    pub async fn save_files(
        &self,
        items: Vec<FileTransferItem>,
        policy: TransferPolicy,
    ) -> Result<SaveFilesResult, TeensyError> {
        self.run(move |c| save_files(c, items, &policy)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::fast_config;
    use tr_model::TeensyToken;
    use tr_shared::{FakeSerialIo, SharedSerial};

    #[test_log::test(tokio::test)]
    async fn test_toggle_music_runs_off_the_runtime() {
        let fake = FakeSerialIo::new();
        fake.push_reply(TeensyToken::Ack.to_bytes().to_vec());
        let client = AsyncTeensyClient::new(TeensyClient::new(
            SharedSerial::new(Box::new(fake.clone())),
            fast_config(),
        ));

        client.toggle_music().await.unwrap();
        assert_eq!(fake.written_bytes(), vec![0x64, 0x66]);
    }

    #[test_log::test(tokio::test)]
    async fn test_errors_cross_the_boundary() {
        let fake = FakeSerialIo::new();
        let client = AsyncTeensyClient::new(TeensyClient::new(
            SharedSerial::new(Box::new(fake)),
            fast_config(),
        ));

        let err = client.toggle_music().await.unwrap_err();
        assert!(matches!(err, TeensyError::Ack { .. }));
    }
}
