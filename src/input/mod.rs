//! Input module: Raw terminal input decoded into queued events.
//!
//! This module contains:
//! - [`Event`]: Keyboard and SGR mouse events classified from raw chunks
//! - [`InputSource`]: The seam between the manager and the byte stream
//! - [`StdinSource`] / [`ChannelSource`]: Stdin-backed and channel-fed sources
//! - [`InputManager`]: Raw-mode lifecycle and the FIFO event queue

mod event;
mod manager;
mod reader;
mod source;

pub use event::{Event, KeyboardEvent, MouseAction, MouseButton, MouseEvent};
pub use manager::{InputConfig, InputManager, MOUSE_TRACKING_DISABLE, MOUSE_TRACKING_ENABLE};
pub use reader::StdinSource;
pub use source::{ChannelSource, InputSource};
