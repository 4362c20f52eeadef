use std::fmt;
use std::io;

/// Coarse classification of a [`ChannelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ChannelUnavailable,
    ConnectFailed,
    WriteFailed,
    ReadFailed,
    EnumerationFailed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::ChannelUnavailable => "ChannelUnavailable",
            ErrorKind::ConnectFailed => "ConnectFailed",
            ErrorKind::WriteFailed => "WriteFailed",
            ErrorKind::ReadFailed => "ReadFailed",
            ErrorKind::EnumerationFailed => "EnumerationFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can end a pipe exchange or a namespace query.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The payload was rejected before any connection attempt.
    #[error("message is not valid JSON: {0}")]
    Validation(#[from] serde_json::Error),

    /// The pipe does not exist or no instance became free within the timeout.
    #[error("pipe {name} unavailable (missing or timed out): {source}")]
    Unavailable { name: String, source: io::Error },

    /// Opening the pipe failed.
    #[error("failed to connect to {name}: {source}")]
    ConnectFailed { name: String, source: io::Error },

    /// Writing or flushing the message failed.
    #[error("failed to send message to {name}: {source}")]
    WriteFailed { name: String, source: io::Error },

    /// Reading the response failed.
    #[error("failed to read response from {name}: {source}")]
    ReadFailed { name: String, source: io::Error },

    /// The pipe namespace could not be listed.
    #[error("failed to list pipe namespace: {0}")]
    EnumerationFailed(io::Error),
}

impl ChannelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChannelError::Validation(_) => ErrorKind::Validation,
            ChannelError::Unavailable { .. } => ErrorKind::ChannelUnavailable,
            ChannelError::ConnectFailed { .. } => ErrorKind::ConnectFailed,
            ChannelError::WriteFailed { .. } => ErrorKind::WriteFailed,
            ChannelError::ReadFailed { .. } => ErrorKind::ReadFailed,
            ChannelError::EnumerationFailed(_) => ErrorKind::EnumerationFailed,
        }
    }

    /// Platform error code (`GetLastError` on Windows, `errno` on Unix), if any.
    pub fn os_code(&self) -> Option<i32> {
        self.io_source().and_then(io::Error::raw_os_error)
    }

    /// The underlying I/O error for every kind except validation.
    pub fn io_source(&self) -> Option<&io::Error> {
        match self {
            ChannelError::Validation(_) => None,
            ChannelError::Unavailable { source, .. }
            | ChannelError::ConnectFailed { source, .. }
            | ChannelError::WriteFailed { source, .. }
            | ChannelError::ReadFailed { source, .. }
            | ChannelError::EnumerationFailed(source) => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;
