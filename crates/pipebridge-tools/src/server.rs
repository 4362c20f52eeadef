use std::io::{BufRead, Write};

use pipebridge_channel::PipeBackend;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::protocol::{
    tool_definitions, CallParams, CallResult, Request, Response, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use crate::tools::{is_failure, PipeTools};

/// Line-delimited JSON-RPC 2.0 server for the pipe tools.
///
/// One request per line in, one response per line out. Notifications get no
/// reply. Requests are handled one at a time on the calling thread.
pub struct ToolServer<B: PipeBackend> {
    tools: PipeTools<B>,
    name: String,
    version: String,
}

impl<B: PipeBackend> ToolServer<B> {
    pub fn new(tools: PipeTools<B>) -> Self {
        Self {
            tools,
            name: "pipebridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the name and version reported from `initialize`.
    pub fn with_server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = name.into();
        self.version = version.into();
        self
    }

    /// Serve until `reader` hits EOF.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<()> {
        info!(server = %self.name, "tool server listening on stream");
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line),
                Err(err) => {
                    warn!(error = %err, "request line is not valid UTF-8");
                    Some(Response::failure(
                        Value::Null,
                        PARSE_ERROR,
                        format!("parse error: {err}"),
                    ))
                }
            };
            if let Some(response) = response {
                serde_json::to_writer(&mut writer, &response)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }
        info!("input closed, tool server stopping");
        Ok(())
    }

    /// Handle one raw request line. `None` for notifications.
    pub fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "unparseable request");
                return Some(Response::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("parse error: {err}"),
                ));
            }
        };

        let request: Request = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(err) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                return Some(Response::failure(
                    id,
                    INVALID_REQUEST,
                    format!("invalid request: {err}"),
                ));
            }
        };

        let Some(id) = request.id else {
            debug!(method = %request.method, "notification");
            return None;
        };
        debug!(method = %request.method, "request");

        Some(match self.dispatch(&request.method, request.params) {
            Ok(result) => Response::success(id, result),
            Err((code, message)) => Response::failure(id, code, message),
        })
    }

    fn dispatch(&self, method: &str, params: Value) -> std::result::Result<Value, (i64, String)> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": { "name": self.name, "version": self.version },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => self.call_tool(params),
            other => Err((METHOD_NOT_FOUND, format!("method not found: {other}"))),
        }
    }

    fn call_tool(&self, params: Value) -> std::result::Result<Value, (i64, String)> {
        let params: CallParams = serde_json::from_value(params)
            .map_err(|err| (INVALID_PARAMS, format!("invalid tools/call params: {err}")))?;

        let text = self
            .tools
            .call(&params.name, params.arguments)
            .map_err(|err| (INVALID_PARAMS, err.to_string()))?;

        let is_error = is_failure(&text);
        if is_error {
            warn!(tool = %params.name, result = %text, "tool reported failure");
        }
        serde_json::to_value(CallResult::text(text, is_error))
            .map_err(|err| (INTERNAL_ERROR, err.to_string()))
    }
}
