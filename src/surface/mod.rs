//! Surface module: The in-memory grid and its flush renderer.
//!
//! This module contains:
//! - [`Surface`]: Char, format and dirty grids with bounds-checked access
//! - [`Layer`] / [`CellValue`]: Explicit grid selection
//! - [`flush`]: Rendering dirty runs into minimal ANSI sequences

mod layer;
#[allow(clippy::module_inception)]
mod surface;
pub mod flush;

pub use flush::FlushStats;
pub use layer::{CellValue, Layer};
pub use surface::{Surface, DEFAULT_CLEAR_FORMAT};
