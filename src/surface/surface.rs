//! Surface: A fixed-size character grid with dirty-cell tracking.
//!
//! The surface keeps three parallel grids in contiguous `Vec`s, all in
//! row-major order (`index = y * width + x`):
//!
//! - chars: the displayed character, or `None` for a blank cell
//! - formats: an opaque SGR token per cell (`""` means reset)
//! - dirty: whether the cell changed since the last flush
//!
//! All three always hold exactly `width * height` entries.

use super::flush::{render_dirty, FlushStats};
use super::layer::{CellValue, Layer};
use crate::error::SurfaceError;
use crate::terminal::{terminal_size, OutputBuffer};
use std::io::{self, Write};

/// Format token used by [`Surface::clear_default`] (SGR reset).
pub const DEFAULT_CLEAR_FORMAT: &str = "0";

/// A character grid that renders only its changed cells.
///
/// A new surface is blank and fully dirty, so the first [`flush`](Self::flush)
/// paints every cell.
#[derive(Clone)]
pub struct Surface {
    /// Displayed characters (row-major).
    chars: Vec<Option<char>>,
    /// Format tokens (row-major).
    formats: Vec<String>,
    /// Changed-since-last-flush flags (row-major).
    dirty: Vec<bool>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
    /// Reused between flushes.
    output: OutputBuffer,
}

impl Surface {
    /// Create a blank surface with the given dimensions.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Surface dimensions must be non-zero");
        let size = usize::from(width) * usize::from(height);
        Self {
            chars: vec![None; size],
            formats: vec![String::new(); size],
            dirty: vec![true; size],
            width,
            height,
            output: OutputBuffer::new(),
        }
    }

    /// Create a surface covering the whole terminal attached to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be queried.
    pub fn full_size() -> io::Result<Self> {
        let (width, height) = terminal_size()?;
        Ok(Self::new(width, height))
    }

    /// Get the surface width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the surface height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The char grid, row-major.
    #[inline]
    pub fn chars(&self) -> &[Option<char>] {
        &self.chars
    }

    /// The format grid, row-major.
    #[inline]
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// The dirty grid, row-major.
    #[inline]
    pub fn dirty_flags(&self) -> &[bool] {
        &self.dirty
    }

    /// Number of cells waiting for the next flush.
    pub fn dirty_count(&self) -> usize {
        self.dirty.iter().filter(|&&d| d).count()
    }

    /// Convert (x, y) to a linear index, or a bounds error.
    #[inline]
    fn index_of(&self, x: usize, y: usize) -> Result<usize, SurfaceError> {
        if x < usize::from(self.width) && y < usize::from(self.height) {
            Ok(y * usize::from(self.width) + x)
        } else {
            Err(SurfaceError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Read one cell of the selected grid.
    pub fn read(&self, x: u16, y: u16, layer: Layer) -> Result<CellValue, SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        Ok(match layer {
            Layer::Char => CellValue::Char(self.chars[idx]),
            Layer::Format => CellValue::Format(self.formats[idx].clone()),
            Layer::Dirty => CellValue::Dirty(self.dirty[idx]),
        })
    }

    /// Read the character at (x, y); `None` is a blank cell.
    pub fn char_at(&self, x: u16, y: u16) -> Result<Option<char>, SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        Ok(self.chars[idx])
    }

    /// Read the format token at (x, y).
    pub fn format_at(&self, x: u16, y: u16) -> Result<&str, SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        Ok(&self.formats[idx])
    }

    /// Whether (x, y) changed since the last flush.
    pub fn is_dirty(&self, x: u16, y: u16) -> Result<bool, SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        Ok(self.dirty[idx])
    }

    /// Write a value into the grid named by its variant.
    ///
    /// Char and format writes mark the cell dirty. A dirty-layer write stores
    /// the given flag as-is.
    pub fn write(
        &mut self,
        x: u16,
        y: u16,
        value: impl Into<CellValue>,
    ) -> Result<(), SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        self.store(idx, value.into());
        Ok(())
    }

    /// Set the character at (x, y) and mark it dirty.
    pub fn set_char(&mut self, x: u16, y: u16, c: Option<char>) -> Result<(), SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        self.chars[idx] = c;
        self.dirty[idx] = true;
        Ok(())
    }

    /// Set the format token at (x, y) and mark it dirty.
    pub fn set_format(&mut self, x: u16, y: u16, token: &str) -> Result<(), SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        assign_token(&mut self.formats[idx], token);
        self.dirty[idx] = true;
        Ok(())
    }

    /// Set both character and format at (x, y) and mark it dirty.
    pub fn write_cell(
        &mut self,
        x: u16,
        y: u16,
        c: Option<char>,
        format: &str,
    ) -> Result<(), SurfaceError> {
        let idx = self.index_of(x.into(), y.into())?;
        self.put(idx, c, format);
        Ok(())
    }

    /// Write `text` left-to-right from (x, y), one cell per `char`.
    ///
    /// There is no wrapping: the first character past the right edge fails
    /// with a bounds error, and the characters before it stay written.
    pub fn write_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        format: &str,
    ) -> Result<(), SurfaceError> {
        for (offset, c) in text.chars().enumerate() {
            let idx = self.index_of(usize::from(x) + offset, y.into())?;
            self.put(idx, Some(c), format);
        }
        Ok(())
    }

    /// Fill the half-open rectangle `[min x, max x) × [min y, max y)`.
    ///
    /// Corners may be given in any order. A rectangle with zero width or
    /// height fills nothing. A rectangle reaching past the surface fails
    /// before any cell is written.
    pub fn fill_rect(
        &mut self,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        value: impl Into<CellValue>,
    ) -> Result<(), SurfaceError> {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        if left == right || top == bottom {
            return Ok(());
        }

        // The far corner bounds every cell in the rect.
        self.index_of(usize::from(right) - 1, usize::from(bottom) - 1)?;

        let value = value.into();
        let width = usize::from(self.width);
        for row in usize::from(top)..usize::from(bottom) {
            for col in usize::from(left)..usize::from(right) {
                self.store(row * width + col, value.clone());
            }
        }
        Ok(())
    }

    /// Shift content up by `lines` rows; the bottom rows become blank.
    ///
    /// Every cell is marked dirty afterwards, including the blanked rows, so
    /// the next flush repaints the whole surface. `lines >= height` blanks
    /// the surface.
    pub fn scroll(&mut self, lines: u16) {
        if lines == 0 {
            return;
        }

        let len = self.chars.len();
        let shift = (usize::from(lines) * usize::from(self.width)).min(len);

        self.chars.copy_within(shift.., 0);
        self.chars[len - shift..].fill(None);

        self.formats.drain(..shift);
        self.formats.resize(len, String::new());

        self.dirty.fill(true);
        log::debug!("scrolled surface by {lines} line(s)");
    }

    /// Blank every cell, set every format to `format`, mark everything dirty.
    pub fn clear(&mut self, format: &str) {
        self.chars.fill(None);
        for token in &mut self.formats {
            assign_token(token, format);
        }
        self.dirty.fill(true);
    }

    /// [`clear`](Self::clear) with the SGR reset token.
    pub fn clear_default(&mut self) {
        self.clear(DEFAULT_CLEAR_FORMAT);
    }

    /// Mark every cell dirty so the next flush repaints the whole surface.
    ///
    /// Useful after something else has drawn over the terminal.
    pub fn invalidate(&mut self) {
        self.dirty.fill(true);
    }

    /// Copy every character of this surface into `target` at offset (x, y).
    ///
    /// Formats are not copied; the target keeps its own. Cells falling
    /// outside `target` are clipped silently. Copied cells are dirty in
    /// `target`.
    pub fn blit(&self, target: &mut Self, x: u16, y: u16) {
        let width = usize::from(self.width);
        let target_width = usize::from(target.width);
        let target_height = usize::from(target.height);

        for (row, chars) in self.chars.chunks(width).enumerate() {
            let ty = usize::from(y) + row;
            if ty >= target_height {
                break;
            }
            for (col, c) in chars.iter().enumerate() {
                let tx = usize::from(x) + col;
                if tx >= target_width {
                    break;
                }
                target.store(ty * target_width + tx, CellValue::Char(*c));
            }
        }
    }

    /// Render a row as a string, blanks shown as spaces.
    pub fn row_text(&self, y: u16) -> Result<String, SurfaceError> {
        let start = self.index_of(0, y.into())?;
        let end = start + usize::from(self.width);
        Ok(self.chars[start..end]
            .iter()
            .map(|c| match c {
                None | Some('\0') => ' ',
                Some(c) => *c,
            })
            .collect())
    }

    /// Render every dirty run to `out` in a single write, then mark all
    /// cells clean.
    ///
    /// Nothing is written when no cell is dirty.
    ///
    /// # Errors
    ///
    /// Returns the sink's error unmodified. The dirty grid is already clean
    /// at that point.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<FlushStats> {
        let mut output = std::mem::take(&mut self.output);
        output.clear();

        let stats = render_dirty(self, &mut output);
        self.dirty.fill(false);

        let written = if output.is_empty() {
            Ok(())
        } else {
            output.flush_to(out)
        };
        self.output = output;
        written?;

        log::trace!("flushed surface: {stats:?}");
        Ok(stats)
    }

    #[inline]
    fn put(&mut self, idx: usize, c: Option<char>, format: &str) {
        self.chars[idx] = c;
        assign_token(&mut self.formats[idx], format);
        self.dirty[idx] = true;
    }

    #[inline]
    fn store(&mut self, idx: usize, value: CellValue) {
        match value {
            CellValue::Char(c) => {
                self.chars[idx] = c;
                self.dirty[idx] = true;
            }
            CellValue::Format(token) => {
                self.formats[idx] = token;
                self.dirty[idx] = true;
            }
            CellValue::Dirty(flag) => self.dirty[idx] = flag,
        }
    }
}

/// Overwrite `slot` with `token`, reusing its allocation.
#[inline]
fn assign_token(slot: &mut String, token: &str) {
    if slot != token {
        slot.clear();
        slot.push_str(token);
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dirty_cells", &self.dirty_count())
            .finish()
    }
}
