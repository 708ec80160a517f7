//! UI error type.

use std::io;
use thiserror::Error;

/// Errors that end an editing session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("terminal reported a window of {cols}x{rows}")]
    TerminalSize { cols: u16, rows: u16 },

    #[error("input closed")]
    InputClosed,
}

/// UI result
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps a read failure, treating end of input as [`Error::InputClosed`].
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::InputClosed
        } else {
            Self::Io(err)
        }
    }
}
