//! Error types shared by the transport, the JSON layer and the high-level API.

use std::io;

use thiserror::Error;

/// Result of library operations with error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification.
///
/// `Closed`, `Malformed` and `Io` are hard errors: once one of them is
/// latched on a [`Connection`](crate::Connection), reinitialization tears
/// down and reopens both sockets. `Failed` only needs its flag cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The peer disconnected, or socket discovery produced no usable path.
    Closed,
    /// i3 sent data the library cannot make sense of: a bad frame, an
    /// oversized message, a JSON scan or parse failure, or a reply of the
    /// wrong type.
    Malformed,
    /// A local read or write failure not classified as EOF.
    Io,
    /// i3 reported `success: false` for a command sub-result.
    Failed,
    /// A previous error is latched; the operation was not attempted.
    BadState,
}

impl ErrorKind {
    /// Hard errors invalidate the sockets; soft ones only latch a flag.
    pub fn is_hard(self) -> bool {
        matches!(self, ErrorKind::Closed | ErrorKind::Malformed | ErrorKind::Io)
    }
}

/// Errors reported by this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection with i3 closed.
    #[error("connection with i3 closed: {0}")]
    Closed(String),

    /// i3 sent invalid data.
    #[error("i3 sent invalid data: {0}")]
    Malformed(String),

    /// General I/O failure.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    /// A command sub-result came back with `success: false`.
    #[error("subcommand {index} failed: '{message}'")]
    CommandFailed {
        /// Index of the failing sub-result within the command reply.
        index: usize,
        /// Error string reported by i3, empty if none was given.
        message: String,
    },

    /// The connection is in an error state; no work was performed.
    #[error("connection in error state ({0:?}), operation not attempted")]
    BadState(ErrorKind),
}

impl Error {
    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Closed(_) => ErrorKind::Closed,
            Error::Malformed(_) => ErrorKind::Malformed,
            Error::Io(_) => ErrorKind::Io,
            Error::CommandFailed { .. } => ErrorKind::Failed,
            Error::BadState(_) => ErrorKind::BadState,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::Closed("eof".into()).kind(), ErrorKind::Closed);
        assert_eq!(Error::Malformed("bad".into()).kind(), ErrorKind::Malformed);
        let err = Error::CommandFailed { index: 2, message: "no window".into() };
        assert_eq!(err.kind(), ErrorKind::Failed);
        assert!(!ErrorKind::Failed.is_hard());
        assert!(ErrorKind::Closed.is_hard());
        assert!(ErrorKind::Malformed.is_hard());
        assert!(ErrorKind::Io.is_hard());
    }

    #[test]
    fn test_display_carries_context() {
        let err = Error::CommandFailed { index: 0, message: "unknown command".into() };
        assert_eq!(err.to_string(), "subcommand 0 failed: 'unknown command'");
    }
}
