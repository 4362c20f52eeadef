//! Named-pipe tools for an LLM orchestrator.
//!
//! [`PipeTools`] wraps the channel client in four operations that always
//! answer with a plain string. Failures are marked with a leading `[Error]`
//! or `[ValidationError]`. [`ToolServer`] serves those operations as
//! JSON-RPC 2.0 `tools/list` / `tools/call` over a line-delimited stream
//! such as stdio.

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{Result, ToolError};
pub use protocol::{tool_definitions, PROTOCOL_VERSION};
pub use server::ToolServer;
pub use tools::{
    format_error, is_failure, PipeTools, ERROR_MARKER, NO_PIPES_MESSAGE, VALIDATION_ERROR_MARKER,
};
