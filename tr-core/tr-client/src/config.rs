//! Timing knobs for command exchanges and bulk uploads

use std::time::Duration;

/// Bounded waits used by every command
///
/// Defaults match what current firmware needs on a 115200 baud link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// How long to wait for a 2-byte ack or control token
    pub ack_timeout: Duration,
    /// Sleep between `bytes_to_read` polls while waiting for an ack
    pub poll_interval: Duration,
    /// Upper bound for receiving a whole directory listing
    pub directory_timeout: Duration,
    /// Sleep while no directory bytes are available
    pub directory_poll_backoff: Duration,
    /// How long to collect the reply to a discovery ping
    pub handshake_wait: Duration,
    /// Wait before draining device text after a refused phase
    pub failure_drain_wait: Duration,
    /// Wait before draining device text after a refused upload
    pub upload_drain_wait: Duration,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_millis(500),
            poll_interval: Duration::from_millis(10),
            directory_timeout: Duration::from_secs(10),
            directory_poll_backoff: Duration::from_millis(50),
            handshake_wait: Duration::from_millis(200),
            failure_drain_wait: Duration::from_millis(100),
            upload_drain_wait: Duration::from_millis(500),
        }
    }
}

impl ProtocolConfig {
    /// Override the directory listing deadline
    pub fn with_directory_timeout(mut self, timeout: Duration) -> Self {
        self.directory_timeout = timeout;
        self
    }
}

/// Retry behaviour for uploading a batch of files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPolicy {
    /// Attempts per file, including the first
    pub retry_limit: u32,
    /// Base backoff; attempt `n` waits `retry_backoff * n`
    pub retry_backoff: Duration,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            retry_limit: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }
}
