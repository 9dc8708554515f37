//! Error types for surface access and terminal I/O.

use std::io;
use thiserror::Error;

/// Failure of a grid access on a [`Surface`](crate::Surface).
///
/// Out-of-bounds access is a layout bug in the caller, never a runtime
/// condition to recover from. Coordinates are reported as `usize` because
/// text writes can run past `u16::MAX`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// `x >= width` or `y >= height`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Surface width.
        width: u16,
        /// Surface height.
        height: u16,
    },
}

/// Any error produced while driving a surface against a real terminal.
#[derive(Error, Debug)]
pub enum Error {
    /// Grid access outside the surface.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// I/O failure on the output sink or input source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for host code mixing surface and I/O failures.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = SurfaceError::OutOfBounds {
            x: 80,
            y: 3,
            width: 80,
            height: 25,
        };
        assert_eq!(err.to_string(), "cell (80, 3) is outside the 80x25 surface");
    }

    #[test]
    fn test_error_conversions() {
        let err: Error = SurfaceError::OutOfBounds {
            x: 0,
            y: 9,
            width: 4,
            height: 4,
        }
        .into();
        assert!(matches!(err, Error::Surface(_)));

        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
