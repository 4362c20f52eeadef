/// Errors from tool dispatch and the tool server loop.
///
/// Pipe failures are not in here: tools report those inside their string
/// result.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool with this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments did not match the tool's input schema.
    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        source: serde_json::Error,
    },

    /// Reading requests or writing responses failed.
    #[error("tool server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;
