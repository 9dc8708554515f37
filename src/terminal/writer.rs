//! Terminal: A cursor-aware text writer over a [`Surface`].
//!
//! The writer owns only the cursor and the current format. Cells live in
//! the borrowed surface, which stays reachable through
//! [`Terminal::surface_mut`] for flushing.

use crate::error::SurfaceError;
use crate::surface::Surface;

/// Format applied to printed text until [`Terminal::set_format`] is called.
pub const DEFAULT_FORMAT: &str = "0";

/// Tab stops every this many columns.
pub const TAB_WIDTH: u16 = 8;

/// Prints text onto a surface with wrapping and scrolling.
///
/// After every printed character the cursor is kept inside the surface:
/// reaching the right edge wraps to the next row, and moving below the last
/// row scrolls the surface up by one line.
pub struct Terminal<'a> {
    /// Target surface.
    surface: &'a mut Surface,
    /// Cursor column.
    x: u16,
    /// Cursor row.
    y: u16,
    /// SGR token for printed characters.
    format: String,
}

impl<'a> Terminal<'a> {
    /// Create a writer with the cursor at the origin.
    pub fn new(surface: &'a mut Surface) -> Self {
        Self {
            surface,
            x: 0,
            y: 0,
            format: DEFAULT_FORMAT.to_owned(),
        }
    }

    /// Width of the underlying surface.
    #[inline]
    pub fn width(&self) -> u16 {
        self.surface.width()
    }

    /// Height of the underlying surface.
    #[inline]
    pub fn height(&self) -> u16 {
        self.surface.height()
    }

    /// Cursor position as `(x, y)`.
    #[inline]
    pub const fn cursor(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// Move the cursor.
    ///
    /// No clamping is applied; printing from an out-of-range cursor fails
    /// with a bounds error.
    pub fn goto(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    /// The format applied to printed characters.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Change the format applied to subsequently printed characters.
    pub fn set_format(&mut self, token: impl Into<String>) {
        self.format = token.into();
    }

    /// The underlying surface.
    pub fn surface(&self) -> &Surface {
        self.surface
    }

    /// The underlying surface, for flushing or direct drawing.
    pub fn surface_mut(&mut self) -> &mut Surface {
        self.surface
    }

    /// Print `text` at the cursor.
    ///
    /// `\r` returns to column 0, `\n` starts a new line, `\t` advances to the
    /// next tab stop. Everything else is written as one cell.
    pub fn print(&mut self, text: &str) -> Result<(), SurfaceError> {
        for c in text.chars() {
            match c {
                '\r' => self.x = 0,
                '\n' => {
                    self.x = 0;
                    self.y = self.y.saturating_add(1);
                }
                '\t' => self.x = self.x.saturating_add(TAB_WIDTH - self.x % TAB_WIDTH),
                _ => {
                    self.surface.write_cell(self.x, self.y, Some(c), &self.format)?;
                    self.x = self.x.saturating_add(1);
                }
            }

            if self.x >= self.surface.width() {
                self.x = 0;
                self.y = self.y.saturating_add(1);
            }

            if self.y >= self.surface.height() {
                self.surface.scroll(1);
                self.y = self.surface.height() - 1;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Terminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("format", &self.format)
            .field("surface", &self.surface)
            .finish()
    }
}
