#![allow(unsafe_code)]
//! Stdin source: Raw mode plus a background reader thread.
//!
//! Enabling raw mode spawns a thread that polls stdin with a short timeout,
//! checking a stop flag between polls, and forwards byte chunks over a
//! crossbeam channel. Disabling raw mode stops and joins the thread before
//! the terminal is restored.

use super::source::{InputSource, Utf8Decoder};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Bytes per read. Covers single keypresses and pastes alike.
const READ_BUF_SIZE: usize = 4096;

/// Interval between stop-flag checks on the reader thread (milliseconds).
#[cfg(unix)]
const POLL_TIMEOUT_MS: i32 = 50;

/// [`InputSource`] backed by the process's stdin.
///
/// Chunks are decoded as UTF-8; a sequence split across two reads is
/// delivered whole with the later chunk.
#[derive(Debug, Default)]
pub struct StdinSource {
    reader: Option<ReaderThread>,
    decoder: Utf8Decoder,
}

impl StdinSource {
    /// Create a source. Nothing is read until raw mode is enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether raw mode is on and the reader thread is running.
    pub const fn is_raw(&self) -> bool {
        self.reader.is_some()
    }
}

impl InputSource for StdinSource {
    fn set_raw_mode(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            if self.reader.is_some() {
                return Ok(());
            }
            crossterm::terminal::enable_raw_mode()?;
            match ReaderThread::spawn() {
                Ok(reader) => self.reader = Some(reader),
                Err(e) => {
                    let _ = crossterm::terminal::disable_raw_mode();
                    return Err(e);
                }
            }
        } else if let Some(mut reader) = self.reader.take() {
            reader.stop();
            self.decoder = Utf8Decoder::default();
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    fn poll_chunk(&mut self, timeout: Duration) -> io::Result<Option<String>> {
        let Some(reader) = &self.reader else {
            return Ok(None);
        };

        match reader.chunks.recv_timeout(timeout) {
            Ok(bytes) => {
                let text = self.decoder.decode(&bytes);
                Ok((!text.is_empty()).then_some(text))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin reader has stopped",
            )),
        }
    }
}

/// Handle to the background stdin reader.
#[derive(Debug)]
struct ReaderThread {
    /// `None` once joined.
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    chunks: Receiver<Vec<u8>>,
}

impl ReaderThread {
    fn spawn() -> io::Result<Self> {
        let (tx, chunks) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("ttysurface-stdin".to_string())
            .spawn(move || {
                Self::run_loop(&tx, &stop_flag);
                log::debug!("stdin reader exited");
            })?;

        Ok(Self {
            handle: Some(handle),
            stop,
            chunks,
        })
    }

    /// Signal the thread and wait for it. Idempotent.
    fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Exits on the stop flag, EOF, a read error, or a dropped receiver.
    #[cfg(unix)]
    fn run_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&mut pfd, 1, POLL_TIMEOUT_MS)
            };
            if ready <= 0 {
                continue;
            }

            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };
            if n <= 0 {
                break;
            }

            #[allow(clippy::cast_sign_loss)] // n > 0
            let chunk = buf[..n as usize].to_vec();
            if tx.send(chunk).is_err() {
                break;
            }
        }
    }

    /// Blocking reads; the stop flag is only seen after the next read returns.
    #[cfg(not(unix))]
    fn run_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::io::Read;

        let stdin = io::stdin();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            match stdin.lock().read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for ReaderThread {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Drop for StdinSource {
    fn drop(&mut self) {
        if self.reader.is_some() {
            let _ = self.set_raw_mode(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_spawn_and_stop() {
        // stdin is not a terminal under the test harness; the thread must
        // still exit promptly.
        let mut reader = ReaderThread::spawn().unwrap();
        reader.stop();
        reader.stop();
        assert!(reader.handle.is_none());
    }

    #[test]
    fn test_reader_drop_does_not_hang() {
        let reader = ReaderThread::spawn().unwrap();
        drop(reader);
    }

    #[test]
    fn test_reader_channel_closes_after_stop() {
        let mut reader = ReaderThread::spawn().unwrap();
        reader.stop();

        while reader.chunks.try_recv().is_ok() {}
        assert!(reader
            .chunks
            .recv_timeout(Duration::from_millis(50))
            .is_err());
    }

    #[test]
    fn test_source_idle_without_raw_mode() {
        let mut source = StdinSource::new();
        assert!(!source.is_raw());
        assert_eq!(source.poll_chunk(Duration::ZERO).unwrap(), None);
    }

    #[test]
    fn test_disable_without_enable_is_noop() {
        let mut source = StdinSource::new();
        source.set_raw_mode(false).unwrap();
        source.set_raw_mode(false).unwrap();
        assert!(!source.is_raw());
    }
}
