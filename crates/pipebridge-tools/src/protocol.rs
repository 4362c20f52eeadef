use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Protocol revision reported from `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Incoming JSON-RPC message. Without an `id` it is a notification.
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// `tools/call` parameters.
#[derive(Debug, Deserialize)]
pub struct CallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// `tools/call` result body.
#[derive(Debug, Serialize)]
pub struct CallResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl CallResult {
    pub fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![TextContent { kind: "text", text }],
            is_error,
        }
    }
}

/// Descriptors returned from `tools/list`.
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": "pipe_send",
            "description": "Connect to a named pipe server, send a JSON message and return the server's response. \
                            Failures start with [Error] or [ValidationError].",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pipe_name": {
                        "type": "string",
                        "description": "Pipe name (e.g. \"mypipe\") or full path (\\\\.\\pipe\\mypipe)"
                    },
                    "message": { "type": "string", "description": "JSON text to send" },
                    "read_response": {
                        "type": "boolean",
                        "default": true,
                        "description": "Read and return the server response"
                    },
                    "timeout_ms": {
                        "type": "integer",
                        "minimum": 0,
                        "default": 5000,
                        "description": "How long to wait for a free pipe instance"
                    }
                },
                "required": ["pipe_name", "message"]
            }
        },
        {
            "name": "pipe_write_only",
            "description": "Send a JSON message to a named pipe without waiting for a response.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pipe_name": { "type": "string", "description": "Pipe name or full path" },
                    "message": { "type": "string", "description": "JSON text to send" },
                    "timeout_ms": { "type": "integer", "minimum": 0, "default": 5000 }
                },
                "required": ["pipe_name", "message"]
            }
        },
        {
            "name": "pipe_list",
            "description": "List the named pipes that currently exist, one per line, sorted.",
            "inputSchema": { "type": "object", "properties": {} }
        },
        {
            "name": "pipe_exists",
            "description": "Check whether a named pipe currently exists. Returns \"exists\" or \"not found\".",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pipe_name": { "type": "string", "description": "Pipe name or full path" }
                },
                "required": ["pipe_name"]
            }
        }
    ])
}
