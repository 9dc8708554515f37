//! # ttysurface
//!
//! A minimal terminal rendering toolkit with dirty-cell tracking.
//!
//! A [`Surface`] keeps a character grid, a parallel grid of SGR format tokens
//! and a dirty flag per cell. Flushing renders only the rows that changed,
//! from their first dirty cell onward, and hands the result to the sink in a
//! single write.
//!
//! ## Core Concepts
//!
//! - **Surface**: Fixed-size grids with bounds-checked reads and writes
//! - **Terminal**: Cursor-aware printing with wrap, tab and scroll
//! - **Events**: Keyboard chunks and SGR mouse reports, decoded without failure
//! - **Input manager**: Raw mode, mouse tracking and a FIFO event queue
//!
//! ## Example
//!
//! ```rust,no_run
//! use ttysurface::{Surface, Terminal};
//!
//! let mut surface = Surface::new(80, 25);
//! surface.clear_default();
//!
//! let mut tty = Terminal::new(&mut surface);
//! tty.set_format("1");
//! tty.print("Hello world!").unwrap();
//!
//! surface.flush(&mut std::io::stdout()).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod input;
pub mod surface;
pub mod terminal;

// Re-exports for convenience
pub use error::{Error, Result, SurfaceError};
pub use input::{
    ChannelSource, Event, InputConfig, InputManager, InputSource, KeyboardEvent, MouseAction,
    MouseButton, MouseEvent, StdinSource,
};
pub use surface::{CellValue, FlushStats, Layer, Surface};
pub use terminal::{terminal_size, Terminal};
