//! Flush rendering: Turn dirty runs into a minimal ANSI sequence.
//!
//! For every row that holds at least one dirty cell:
//! 1. Move the cursor once, to the first dirty column
//! 2. Emit every cell from there to the end of the row
//! 3. Emit an SGR sequence only when the format differs from the last one
//!    emitted during this flush
//!
//! Clean rows produce no output at all. The caller writes the result with
//! one syscall.

use super::Surface;
use crate::terminal::OutputBuffer;

/// Counters for one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Rows that contained at least one dirty cell.
    pub rows_touched: usize,
    /// Cells emitted (dirty cells plus the clean cells after them in a row).
    pub cells_written: usize,
    /// SGR sequences emitted.
    pub style_changes: usize,
    /// Bytes appended to the output.
    pub bytes: usize,
}

impl FlushStats {
    /// True when the flush produced no output.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bytes == 0
    }
}

/// Render every dirty run of `surface` into `output`.
///
/// This does not touch the dirty grid; [`Surface::flush`] clears it after
/// rendering.
#[allow(clippy::cast_possible_truncation)] // Row and column fit the surface's u16 dimensions.
pub fn render_dirty(surface: &Surface, output: &mut OutputBuffer) -> FlushStats {
    let width = usize::from(surface.width());
    let start_len = output.len();
    let mut stats = FlushStats::default();
    let mut previous_format: Option<&str> = None;

    let rows = surface
        .chars()
        .chunks(width)
        .zip(surface.formats().chunks(width))
        .zip(surface.dirty_flags().chunks(width));

    for (y, ((chars, formats), dirty)) in rows.enumerate() {
        let Some(first) = dirty.iter().position(|&d| d) else {
            continue;
        };

        output.cursor_move(first as u16, y as u16);
        stats.rows_touched += 1;

        for (c, format) in chars[first..].iter().zip(&formats[first..]) {
            if previous_format != Some(format.as_str()) {
                output.set_format(format);
                previous_format = Some(format);
                stats.style_changes += 1;
            }

            match c {
                None | Some('\0') => output.write_raw(b" "),
                Some(c) => output.write_char(*c),
            }
            stats.cells_written += 1;
        }
    }

    stats.bytes = output.len() - start_len;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};

    /// Flush into a string.
    fn flush_str(surface: &mut Surface) -> String {
        let mut out = Vec::new();
        surface.flush(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn clean(width: u16, height: u16) -> Surface {
        let mut surface = Surface::new(width, height);
        surface.flush(&mut io::sink()).unwrap();
        surface
    }

    #[test]
    fn test_hi_on_fresh_surface() {
        let mut surface = Surface::new(80, 25);
        surface.write_text(0, 0, "Hi", "1").unwrap();

        let out = flush_str(&mut surface);

        assert!(out.starts_with("\x1b[1;1H\x1b[1mHi"));
        assert_eq!(out.matches("\x1b[1;1H").count(), 1);
        assert_eq!(out.matches("\x1b[1m").count(), 1);
        // The rest of the fresh surface carries the empty format
        assert!(out.starts_with("\x1b[1;1H\x1b[1mHi\x1b[0m "));
        assert_eq!(out.matches('H').count(), 25 + 1);
    }

    #[test]
    fn test_hi_on_clean_surface() {
        let mut surface = clean(80, 25);
        surface.write_text(0, 0, "Hi", "1").unwrap();

        let mut out = Vec::new();
        let stats = surface.flush(&mut out).unwrap();

        // Only the row tail from the first dirty cell is emitted
        let expected = format!("\x1b[1;1H\x1b[1mHi\x1b[0m{}", " ".repeat(78));
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(stats.rows_touched, 1);
        assert_eq!(stats.cells_written, 80);
        assert_eq!(stats.style_changes, 2);
        assert_eq!(stats.bytes, expected.len());
    }

    #[test]
    fn test_trailing_cells_share_format() {
        let mut surface = clean(4, 1);
        surface.fill_rect(0, 0, 4, 1, "1").unwrap();
        surface.flush(&mut io::sink()).unwrap();

        surface.write_text(1, 0, "ab", "1").unwrap();
        assert_eq!(flush_str(&mut surface), "\x1b[1;2H\x1b[1mab ");
    }

    #[test]
    fn test_second_flush_is_empty() {
        let mut surface = Surface::new(10, 4);
        surface.write_text(2, 2, "x", "").unwrap();
        assert!(!flush_str(&mut surface).is_empty());
        assert_eq!(surface.dirty_count(), 0);

        let mut out = Vec::new();
        let stats = surface.flush(&mut out).unwrap();
        assert!(out.is_empty());
        assert!(stats.is_empty());
        assert_eq!(stats, FlushStats::default());
    }

    #[test]
    fn test_clean_rows_skipped() {
        let mut surface = clean(6, 4);
        surface.write_text(3, 1, "a", "").unwrap();
        surface.write_text(0, 3, "b", "").unwrap();

        assert_eq!(
            flush_str(&mut surface),
            "\x1b[2;4H\x1b[0ma  \x1b[4;1Hb     "
        );
    }

    #[test]
    fn test_format_tracked_across_rows() {
        let mut surface = clean(2, 2);
        surface.fill_rect(0, 0, 2, 2, "32").unwrap();

        // One SGR for the whole flush, one cursor move per row
        assert_eq!(flush_str(&mut surface), "\x1b[1;1H\x1b[32m  \x1b[2;1H  ");
    }

    #[test]
    fn test_format_state_resets_between_flushes() {
        let mut surface = clean(3, 1);
        surface.write_text(0, 0, "a", "1").unwrap();
        surface.flush(&mut io::sink()).unwrap();

        surface.write_text(2, 0, "c", "1").unwrap();
        assert_eq!(flush_str(&mut surface), "\x1b[1;3H\x1b[1mc");
    }

    #[test]
    fn test_blank_and_nul_render_as_space() {
        let mut surface = clean(3, 1);
        surface.write_cell(0, 0, Some('\0'), "").unwrap();
        surface.write_cell(2, 0, Some('z'), "").unwrap();
        assert_eq!(flush_str(&mut surface), "\x1b[1;1H\x1b[0m  z");
    }

    #[test]
    fn test_render_dirty_leaves_flags() {
        let mut surface = clean(3, 1);
        surface.set_char(1, 0, Some('q')).unwrap();

        let mut output = OutputBuffer::new();
        let stats = render_dirty(&surface, &mut output);
        assert_eq!(output.as_bytes(), b"\x1b[1;2H\x1b[0mq ");
        assert_eq!(stats.cells_written, 2);
        assert_eq!(surface.dirty_count(), 1);
    }

    #[test]
    fn test_flush_is_one_write() {
        struct CountingWriter(usize);

        impl Write for CountingWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0 += 1;
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut surface = Surface::new(40, 10);
        let mut sink = CountingWriter(0);
        surface.flush(&mut sink).unwrap();
        assert_eq!(sink.0, 1);

        surface.flush(&mut sink).unwrap();
        assert_eq!(sink.0, 1);
    }

    #[test]
    fn test_sink_error_surfaces() {
        struct ClosedWriter;

        impl Write for ClosedWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut surface = Surface::new(4, 2);
        let err = surface.flush(&mut ClosedWriter).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(surface.dirty_count(), 0);
    }

    /// Replay flush output through a VT100 emulator and compare screens.
    fn assert_screen_matches(parser: &vt100::Parser, surface: &Surface) {
        let screen = parser.screen();
        for y in 0..surface.height() {
            let expected = surface.row_text(y).unwrap();
            let actual: String = (0..surface.width())
                .map(|x| {
                    let contents = screen.cell(y, x).map(vt100::Cell::contents).unwrap_or_default();
                    contents.chars().next().unwrap_or(' ')
                })
                .collect();
            assert_eq!(actual, expected, "row {y}");
        }
    }

    #[test]
    fn test_emulator_replay() {
        let mut surface = Surface::new(12, 4);
        let mut parser = vt100::Parser::new(4, 12, 0);

        surface.write_text(0, 0, "title", "1").unwrap();
        surface.write_text(3, 2, "body", "").unwrap();
        let mut out = Vec::new();
        surface.flush(&mut out).unwrap();
        parser.process(&out);
        assert_screen_matches(&parser, &surface);
        assert!(parser.screen().cell(0, 0).unwrap().bold());
        assert!(!parser.screen().cell(2, 3).unwrap().bold());

        // Incremental update overwrites only part of a row
        surface.write_text(5, 2, "XY", "7").unwrap();
        out.clear();
        surface.flush(&mut out).unwrap();
        parser.process(&out);
        assert_screen_matches(&parser, &surface);
        assert!(parser.screen().cell(2, 5).unwrap().inverse());

        // Scrolling repaints everything
        surface.scroll(1);
        out.clear();
        surface.flush(&mut out).unwrap();
        parser.process(&out);
        assert_screen_matches(&parser, &surface);
    }
}
