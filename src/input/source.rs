//! Input sources: Where raw chunks come from.
//!
//! The [`InputManager`](super::InputManager) never touches process-wide
//! stdin. It talks to an [`InputSource`] handle, which owns raw-mode toggling
//! and delivers decoded text chunks on request.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::io;
use std::time::Duration;

/// A stream of raw terminal input.
pub trait InputSource {
    /// Switch raw, unbuffered mode on (`true`) or restore buffered mode.
    ///
    /// Must tolerate repeated calls with the same value.
    fn set_raw_mode(&mut self, enabled: bool) -> io::Result<()>;

    /// Wait up to `timeout` for the next chunk.
    ///
    /// `Ok(None)` means nothing arrived in time. A zero timeout only
    /// returns chunks that are already pending.
    fn poll_chunk(&mut self, timeout: Duration) -> io::Result<Option<String>>;
}

/// An [`InputSource`] fed through a crossbeam channel.
///
/// For hosts that read the byte stream themselves, and for tests. Raw mode
/// is only recorded.
#[derive(Debug)]
pub struct ChannelSource {
    chunks: Receiver<String>,
    raw: bool,
}

impl ChannelSource {
    /// Wrap an existing receiver.
    pub const fn new(chunks: Receiver<String>) -> Self {
        Self { chunks, raw: false }
    }

    /// Create a source together with the sender that feeds it.
    pub fn pair() -> (Sender<String>, Self) {
        let (tx, rx) = unbounded();
        (tx, Self::new(rx))
    }

    /// Whether raw mode is currently requested.
    pub const fn is_raw(&self) -> bool {
        self.raw
    }
}

impl InputSource for ChannelSource {
    fn set_raw_mode(&mut self, enabled: bool) -> io::Result<()> {
        self.raw = enabled;
        Ok(())
    }

    fn poll_chunk(&mut self, timeout: Duration) -> io::Result<Option<String>> {
        match self.chunks.recv_timeout(timeout) {
            Ok(chunk) => Ok(Some(chunk)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

/// Incremental UTF-8 decoding across read boundaries.
///
/// An incomplete sequence at the end of a read is held back until the next
/// read completes it. Invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Decode `bytes`, returning every complete character so far.
    pub(crate) fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let complete = match std::str::from_utf8(&self.pending) {
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            _ => self.pending.len(),
        };

        let text = String::from_utf8_lossy(&self.pending[..complete]).into_owned();
        self.pending.drain(..complete);
        text
    }

    /// Bytes held back for the next read.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.pending.len()
    }
}
