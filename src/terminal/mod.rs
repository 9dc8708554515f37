//! Terminal module: Text layout over a surface and the bytes sent to the tty.
//!
//! - [`Terminal`]: Cursor-aware writer with wrap, tab and scroll
//! - [`OutputBuffer`]: Accumulates escape sequences for a single write
//! - [`terminal_size`]: Startup dimensions of the attached terminal

mod output;
mod size;
mod writer;

pub use output::OutputBuffer;
pub use size::terminal_size;
pub use writer::{Terminal, DEFAULT_FORMAT, TAB_WIDTH};
