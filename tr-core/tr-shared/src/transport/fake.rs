//! Fake transport implementation for testing
//!
//! Simulates a cartridge without hardware. Replies are staged ahead of time and
//! become readable only after the host has written something since the previous
//! reply was released, so a test can script "device answers each phase" without
//! counting individual writes.

use super::{SerialIo, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct FakeState {
    open: bool,
    readable: VecDeque<u8>,
    staged: VecDeque<Vec<u8>>,
    written_since_release: bool,
    writes: Vec<Vec<u8>>,
    clears: usize,
}

impl FakeState {
    fn release(&mut self) {
        if !self.written_since_release {
            return;
        }
        if let Some(reply) = self.staged.pop_front() {
            self.readable.extend(reply);
            self.written_since_release = false;
        }
    }
}

/// Scripted in-memory transport
///
/// Clones share state, so a test can hand one clone to the code under test and
/// inspect writes through another.
#[derive(Debug, Clone)]
pub struct FakeSerialIo {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeSerialIo {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSerialIo {
    /// Create an open fake transport with nothing scripted
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                open: true,
                ..Default::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stage a reply to be released after the next host write
    pub fn push_reply(&self, bytes: impl Into<Vec<u8>>) {
        self.state().staged.push_back(bytes.into());
    }

    /// Make bytes readable immediately, as if the device sent them unprompted
    pub fn push_unsolicited(&self, bytes: &[u8]) {
        self.state().readable.extend(bytes.iter().copied());
    }

    pub fn set_open(&self, open: bool) {
        self.state().open = open;
    }

    /// Every `write_all` call, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state().writes.clone()
    }

    /// All written bytes concatenated
    pub fn written_bytes(&self) -> Vec<u8> {
        self.state().writes.concat()
    }

    /// Replies that were never released
    pub fn staged_reply_count(&self) -> usize {
        self.state().staged.len()
    }

    /// Bytes released but not yet read
    pub fn unread_count(&self) -> usize {
        self.state().readable.len()
    }

    /// How many times the buffers were cleared
    pub fn clear_count(&self) -> usize {
        self.state().clears
    }
}

impl SerialIo for FakeSerialIo {
    fn name(&self) -> &str {
        "fake"
    }

    fn is_open(&self) -> bool {
        self.state().open
    }

    fn bytes_to_read(&mut self) -> Result<usize, TransportError> {
        let mut state = self.state();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.release();
        Ok(state.readable.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut state = self.state();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.release();
        let n = buf.len().min(state.readable.len());
        for (slot, byte) in buf.iter_mut().zip(state.readable.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.writes.push(data.to_vec());
        state.written_since_release = true;
        Ok(())
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        let mut state = self.state();
        state.readable.clear();
        state.clears += 1;
        Ok(())
    }
}
