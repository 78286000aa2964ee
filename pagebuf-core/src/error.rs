//! Error types for buffer operations.

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Main error type for buffer operations.
///
/// Every failing operation leaves the buffer exactly as it was: content
/// length, page layout, and cursors are unchanged on error.
#[derive(Error, Debug)]
pub enum Error {
    /// The allocator refused a reservation.
    #[error("allocation of {requested} bytes failed")]
    OutOfMemory {
        /// Number of bytes the failed reservation asked for.
        requested: usize,
    },

    /// A fixed-width read found fewer content bytes than it requires.
    #[error("needed {needed} bytes but only {available} available")]
    Exhausted {
        /// Bytes the caller asked for.
        needed: usize,
        /// Content bytes the buffer held at the time.
        available: usize,
    },

    /// A `Display` implementation reported an error mid-format.
    #[error("formatter error")]
    Format,

    /// Buffer content was not valid UTF-8.
    #[error("buffer content is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

/// Result type alias for buffer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match &err {
            Error::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            Error::Exhausted { .. } => io::ErrorKind::UnexpectedEof,
            Error::Format | Error::Utf8(_) => io::ErrorKind::InvalidData,
        };
        Self::new(kind, err)
    }
}
