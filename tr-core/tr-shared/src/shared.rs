//! Shared serial connection with an auto-read background reader
//!
//! The cartridge streams unsolicited text (boot messages, "now playing"
//! notices, firmware logs). A background reader drains and logs it while the
//! port is idle. A command takes a [`SerialLease`] for its request/response
//! exchange: the lease holds the port exclusively and pauses the reader until
//! it is dropped, on every exit path.

use crate::transport::{SerialIo, TransportError};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Log target for text the cartridge sends on its own
pub const DEVICE_LOG_TARGET: &str = "teensyrom::device";

/// Unsolicited bytes drained by the background reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOutput {
    pub bytes: Vec<u8>,
}

impl DeviceOutput {
    /// Lossy text rendering, trimmed
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).trim().to_string()
    }
}

struct ReaderHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

struct SerialInner {
    io: Mutex<Box<dyn SerialIo>>,
    name: String,
    leased: AtomicBool,
    reader: Mutex<Option<ReaderHandle>>,
}

impl SerialInner {
    fn lock_io(&self) -> MutexGuard<'_, Box<dyn SerialIo>> {
        // The next lease clears the buffers, so a poisoned port is still usable.
        self.io.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for SerialInner {
    fn drop(&mut self) {
        let reader = match self.reader.get_mut() {
            Ok(reader) => reader.take(),
            Err(e) => e.into_inner().take(),
        };
        if let Some(reader) = reader {
            reader.stop.store(true, Ordering::SeqCst);
        }
    }
}

/// A serial connection shared between the auto-reader and commands
///
/// Cloning is cheap and every clone refers to the same port.
#[derive(Clone)]
pub struct SharedSerial {
    inner: Arc<SerialInner>,
}

impl std::fmt::Debug for SharedSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSerial")
            .field("name", &self.inner.name)
            .field("leased", &self.is_leased())
            .finish()
    }
}

impl SharedSerial {
    pub fn new(io: Box<dyn SerialIo>) -> Self {
        let name = io.name().to_string();
        Self {
            inner: Arc::new(SerialInner {
                io: Mutex::new(io),
                name,
                leased: AtomicBool::new(false),
                reader: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock_io().is_open()
    }

    /// Take exclusive ownership of the port for one exchange
    ///
    /// Blocks until any other lease is released. Stale input is discarded
    /// so the exchange starts from a clean buffer.
    pub fn lease(&self) -> Result<SerialLease<'_>, TransportError> {
        let guard = self.inner.lock_io();
        self.inner.leased.store(true, Ordering::SeqCst);
        log::trace!("{}: lease acquired, auto-read paused", self.inner.name);

        // Built before clearing so a failed clear still releases the flag.
        let mut lease = SerialLease {
            guard,
            leased: &self.inner.leased,
            name: &self.inner.name,
        };
        if lease.is_open() {
            lease.clear_buffers()?;
        }
        Ok(lease)
    }

    /// Whether a command currently holds the port
    pub fn is_leased(&self) -> bool {
        self.inner.leased.load(Ordering::SeqCst)
    }

    /// Whether the background reader is running and allowed to consume bytes
    pub fn is_auto_read_enabled(&self) -> bool {
        let running = match self.inner.reader.lock() {
            Ok(reader) => reader.is_some(),
            Err(_) => false,
        };
        running && !self.is_leased()
    }

    /// Start draining unsolicited bytes in a background thread
    ///
    /// Everything read is logged on [`DEVICE_LOG_TARGET`] and forwarded on the
    /// returned channel. Restarting replaces the previous reader.
    pub fn start_auto_read(&self, poll_interval: Duration) -> UnboundedReceiver<DeviceOutput> {
        self.stop_auto_read();

        let (tx, rx) = unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let weak = Arc::downgrade(&self.inner);
        let thread_stop = stop.clone();
        let spawned = thread::Builder::new()
            .name(format!("auto-read {}", self.inner.name))
            .spawn(move || run_reader(weak, thread_stop, tx, poll_interval));

        match spawned {
            Ok(thread) => {
                log::debug!("{}: auto-read started", self.inner.name);
                let mut reader = self.inner.reader.lock().unwrap_or_else(|e| e.into_inner());
                *reader = Some(ReaderHandle { stop, thread });
            }
            Err(e) => log::error!("{}: failed to start auto-read: {e}", self.inner.name),
        }
        rx
    }

    /// Stop the background reader and wait for it to exit
    pub fn stop_auto_read(&self) {
        let reader = self
            .inner
            .reader
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(reader) = reader {
            reader.stop.store(true, Ordering::SeqCst);
            if reader.thread.join().is_err() {
                log::warn!("{}: auto-read thread panicked", self.inner.name);
            }
            log::debug!("{}: auto-read stopped", self.inner.name);
        }
    }
}

fn run_reader(
    inner: Weak<SerialInner>,
    stop: Arc<AtomicBool>,
    tx: UnboundedSender<DeviceOutput>,
    poll_interval: Duration,
) {
    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        let Some(inner) = inner.upgrade() else {
            break;
        };

        if !inner.leased.load(Ordering::SeqCst) {
            drain_once(&inner, &tx);
        }
        drop(inner);

        thread::sleep(poll_interval);
    }
}

fn drain_once(inner: &SerialInner, tx: &UnboundedSender<DeviceOutput>) {
    let mut io = match inner.io.try_lock() {
        Ok(io) => io,
        Err(TryLockError::WouldBlock) => return,
        Err(TryLockError::Poisoned(e)) => e.into_inner(),
    };
    if !io.is_open() {
        return;
    }

    match io.read_available() {
        Ok(bytes) if bytes.is_empty() => {}
        Ok(bytes) => {
            let output = DeviceOutput { bytes };
            log::info!(target: DEVICE_LOG_TARGET, "{}", output.text());
            // Nobody listening is fine, the log line is the primary sink.
            let _ = tx.send(output);
        }
        Err(e) => log::warn!("{}: auto-read failed: {e}", inner.name),
    }
}

/// Exclusive access to the port for the duration of one command
///
/// Dereferences to the underlying [`SerialIo`]. Dropping the lease resumes
/// the background reader.
pub struct SerialLease<'a> {
    guard: MutexGuard<'a, Box<dyn SerialIo>>,
    leased: &'a AtomicBool,
    name: &'a str,
}

impl Deref for SerialLease<'_> {
    type Target = dyn SerialIo;

    fn deref(&self) -> &Self::Target {
        &**self.guard
    }
}

impl DerefMut for SerialLease<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut **self.guard
    }
}

impl Drop for SerialLease<'_> {
    fn drop(&mut self) {
        self.leased.store(false, Ordering::SeqCst);
        log::trace!("{}: lease released, auto-read resumed", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FakeSerialIo;
    use std::time::Instant;

    fn wait_until(deadline: Duration, mut f: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if f() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        f()
    }

    #[test_log::test]
    fn test_lease_clears_stale_input() {
        let fake = FakeSerialIo::new();
        fake.push_unsolicited(b"boot noise");
        let serial = SharedSerial::new(Box::new(fake.clone()));

        let lease = serial.lease().unwrap();
        assert!(serial.is_leased());
        assert_eq!(fake.unread_count(), 0);
        assert_eq!(fake.clear_count(), 1);
        drop(lease);

        assert!(!serial.is_leased());
    }

    #[test_log::test]
    fn test_lease_on_closed_port_skips_clear() {
        let fake = FakeSerialIo::new();
        fake.set_open(false);
        let serial = SharedSerial::new(Box::new(fake.clone()));

        let lease = serial.lease().unwrap();
        assert!(!lease.is_open());
        assert_eq!(fake.clear_count(), 0);
    }

    #[test_log::test]
    fn test_lease_writes_through_to_port() {
        let fake = FakeSerialIo::new();
        let serial = SharedSerial::new(Box::new(fake.clone()));

        serial.lease().unwrap().write_all(&[0x64, 0x55]).unwrap();
        assert_eq!(fake.written_bytes(), vec![0x64, 0x55]);
    }

    #[test_log::test]
    fn test_auto_read_paused_while_leased() {
        let fake = FakeSerialIo::new();
        let serial = SharedSerial::new(Box::new(fake));
        assert!(!serial.is_auto_read_enabled());

        let _rx = serial.start_auto_read(Duration::from_millis(5));
        assert!(serial.is_auto_read_enabled());

        {
            let _lease = serial.lease().unwrap();
            assert!(!serial.is_auto_read_enabled());
        }
        assert!(serial.is_auto_read_enabled());

        serial.stop_auto_read();
        assert!(!serial.is_auto_read_enabled());
    }

    #[test_log::test]
    fn test_lease_released_on_early_return() {
        fn failing(serial: &SharedSerial) -> Result<(), TransportError> {
            let _lease = serial.lease()?;
            Err(TransportError::Other("boom".into()))
        }

        let serial = SharedSerial::new(Box::new(FakeSerialIo::new()));
        let _rx = serial.start_auto_read(Duration::from_millis(5));
        assert!(failing(&serial).is_err());
        assert!(serial.is_auto_read_enabled());
        serial.stop_auto_read();
    }

    #[test_log::test]
    fn test_auto_read_forwards_unsolicited_bytes() {
        let fake = FakeSerialIo::new();
        let serial = SharedSerial::new(Box::new(fake.clone()));
        let mut rx = serial.start_auto_read(Duration::from_millis(5));

        fake.push_unsolicited(b"Now playing: tune.sid\r\n");

        let mut received = Vec::new();
        let got = wait_until(Duration::from_secs(2), || {
            while let Ok(output) = rx.try_recv() {
                received.extend(output.bytes);
            }
            received.ends_with(b"\r\n")
        });
        assert!(got);
        assert_eq!(
            DeviceOutput { bytes: received }.text(),
            "Now playing: tune.sid"
        );
        assert_eq!(fake.unread_count(), 0);

        serial.stop_auto_read();
    }

    #[test_log::test]
    fn test_auto_read_leaves_leased_bytes_alone() {
        let fake = FakeSerialIo::new();
        let serial = SharedSerial::new(Box::new(fake.clone()));
        let mut rx = serial.start_auto_read(Duration::from_millis(5));

        let lease = serial.lease().unwrap();
        fake.push_unsolicited(b"reply");
        thread::sleep(Duration::from_millis(50));
        assert_eq!(fake.unread_count(), 5);
        assert!(rx.try_recv().is_err());
        drop(lease);

        serial.stop_auto_read();
    }

    #[test_log::test]
    fn test_reader_exits_when_serial_dropped() {
        let serial = SharedSerial::new(Box::new(FakeSerialIo::new()));
        let mut rx = serial.start_auto_read(Duration::from_millis(5));
        drop(serial);

        // The sender lives in the reader thread, so the channel closes once it exits.
        let closed = wait_until(Duration::from_secs(2), || {
            matches!(
                rx.try_recv(),
                Err(tokio::sync::mpsc::error::TryRecvError::Disconnected)
            )
        });
        assert!(closed);
    }

    #[test]
    fn test_device_output_text_is_lossy() {
        let output = DeviceOutput {
            bytes: vec![b' ', b'o', b'k', 0xFF, b'\n'],
        };
        assert_eq!(output.text(), "ok\u{FFFD}");
    }
}
