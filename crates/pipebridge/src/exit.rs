use std::fmt;
use std::io;

use pipebridge_channel::{ChannelError, ErrorKind};
use pipebridge_tools::ToolError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    let io_kind = err.io_source().map(io::Error::kind);
    let code = match (err.kind(), io_kind) {
        (ErrorKind::Validation, _) => DATA_INVALID,
        (_, Some(io::ErrorKind::PermissionDenied)) => PERMISSION_DENIED,
        (_, Some(io::ErrorKind::TimedOut)) => TIMEOUT,
        (ErrorKind::EnumerationFailed, _) => FAILURE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn tool_error(context: &str, err: ToolError) -> CliError {
    match err {
        ToolError::Io(source) => io_error(context, source),
        ToolError::Json(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
        other => CliError::new(USAGE, format!("{context}: {other}")),
    }
}
