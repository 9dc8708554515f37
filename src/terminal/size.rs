//! Terminal size query.

use std::io;

/// Query the current terminal size as `(columns, rows)`.
///
/// # Errors
///
/// Returns an error if stdout is not a terminal or reports a zero size.
pub fn terminal_size() -> io::Result<(u16, u16)> {
    let (columns, rows) = crossterm::terminal::size()?;
    if columns == 0 || rows == 0 {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("terminal reported a {columns}x{rows} size"),
        ));
    }
    Ok((columns, rows))
}
