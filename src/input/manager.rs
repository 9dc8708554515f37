//! Input manager: Raw-mode lifecycle and the event queue.
//!
//! The manager owns an [`InputSource`] and an output handle. Between
//! [`start`](InputManager::start) and [`stop`](InputManager::stop) every chunk
//! the source delivers is classified into an [`Event`] and appended to a FIFO
//! queue the host drains.

use super::event::Event;
use super::reader::StdinSource;
use super::source::InputSource;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::io::{self, Write};
use std::time::Duration;

/// Enables any-motion tracking, urxvt and SGR extended reporting.
pub const MOUSE_TRACKING_ENABLE: &[u8] = b"\x1b[?1003h\x1b[?1015h\x1b[?1006h";

/// Disables button and any-motion tracking.
pub const MOUSE_TRACKING_DISABLE: &[u8] = b"\x1b[?1000l\x1b[?1003l";

/// Configuration for the [`InputManager`].
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Maximum queued events; `None` for an unbounded queue. `Some(0)` is
    /// treated as a capacity of 1.
    pub queue_capacity: Option<usize>,
    /// How long [`InputManager::pump`] waits for the first chunk.
    pub poll_timeout: Duration,
    /// Whether to write the mouse tracking sequences on start and stop.
    pub mouse_tracking: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            queue_capacity: None,
            poll_timeout: Duration::from_millis(10),
            mouse_tracking: true,
        }
    }
}

/// Decodes terminal input into a queue of events.
pub struct InputManager<S: InputSource, W: Write> {
    config: InputConfig,
    source: S,
    output: W,
    queue_tx: Sender<Event>,
    queue_rx: Receiver<Event>,
    active: bool,
}

impl InputManager<StdinSource, io::Stdout> {
    /// A manager reading the process's stdin and writing to its stdout.
    pub fn stdio(config: InputConfig) -> Self {
        Self::new(StdinSource::new(), io::stdout(), config)
    }
}

impl<S: InputSource, W: Write> InputManager<S, W> {
    /// Create an inactive manager.
    pub fn new(source: S, output: W, config: InputConfig) -> Self {
        let (queue_tx, queue_rx) = match config.queue_capacity {
            Some(capacity) => bounded(capacity.max(1)),
            None => unbounded(),
        };

        Self {
            config,
            source,
            output,
            queue_tx,
            queue_rx,
            active: false,
        }
    }

    /// Enter raw mode and enable mouse reporting.
    ///
    /// Calling `start` on an active manager does nothing. If the enable
    /// sequence cannot be written, raw mode is switched back off.
    pub fn start(&mut self) -> io::Result<()> {
        if self.active {
            log::debug!("input manager already started");
            return Ok(());
        }

        self.source.set_raw_mode(true)?;
        if self.config.mouse_tracking {
            if let Err(e) = write_sequence(&mut self.output, MOUSE_TRACKING_ENABLE) {
                let _ = self.source.set_raw_mode(false);
                return Err(e);
            }
        }

        self.active = true;
        log::info!(
            "input started (mouse tracking: {})",
            self.config.mouse_tracking
        );
        Ok(())
    }

    /// Disable mouse reporting and leave raw mode.
    ///
    /// Calling `stop` on an inactive manager does nothing. Events queued
    /// before the call remain available.
    pub fn stop(&mut self) -> io::Result<()> {
        if !self.active {
            log::debug!("input manager not started");
            return Ok(());
        }
        self.active = false;

        let written = if self.config.mouse_tracking {
            write_sequence(&mut self.output, MOUSE_TRACKING_DISABLE)
        } else {
            Ok(())
        };
        let restored = self.source.set_raw_mode(false);

        log::info!("input stopped");
        written.and(restored)
    }

    /// Whether the manager is between `start` and `stop`.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Classify one chunk and queue the event.
    ///
    /// Returns `false` when the chunk was dropped: the manager is inactive or
    /// a bounded queue is full.
    pub fn handle_chunk(&self, chunk: impl Into<String>) -> bool {
        if !self.active {
            return false;
        }

        let event = Event::classify(chunk);
        log::trace!("queued {event:?}");
        match self.queue_tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::warn!("input queue full, dropping {:?}", event.raw());
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Read available chunks from the source, waiting up to the configured
    /// poll timeout for the first one.
    ///
    /// Returns the number of events queued.
    pub fn pump(&mut self) -> io::Result<usize> {
        self.pump_for(self.config.poll_timeout)
    }

    /// Like [`pump`](Self::pump) with an explicit timeout.
    pub fn pump_for(&mut self, timeout: Duration) -> io::Result<usize> {
        let mut queued = 0;
        let mut wait = timeout;

        while self.active {
            let Some(chunk) = self.source.poll_chunk(wait)? else {
                break;
            };
            if self.handle_chunk(chunk) {
                queued += 1;
            }
            wait = Duration::ZERO;
        }

        Ok(queued)
    }

    /// Remove the oldest queued event.
    pub fn pop(&self) -> Option<Event> {
        self.queue_rx.try_recv().ok()
    }

    /// Remove every queued event, oldest first.
    pub fn drain(&self) -> Vec<Event> {
        self.queue_rx.try_iter().collect()
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue_rx.len()
    }

    /// The queue's receiving end, for hosts that select over channels.
    pub const fn queue(&self) -> &Receiver<Event> {
        &self.queue_rx
    }

    /// The active configuration.
    pub const fn config(&self) -> &InputConfig {
        &self.config
    }

    /// The input source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The output handle.
    pub const fn output(&self) -> &W {
        &self.output
    }
}

impl<S: InputSource, W: Write> Drop for InputManager<S, W> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

impl<S: InputSource, W: Write> std::fmt::Debug for InputManager<S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputManager")
            .field("config", &self.config)
            .field("active", &self.active)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

fn write_sequence(output: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    output.write_all(bytes)?;
    output.flush()
}
