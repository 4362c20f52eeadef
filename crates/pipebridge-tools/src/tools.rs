use std::sync::Arc;
use std::time::Duration;

use pipebridge_channel::{
    ChannelDirectory, ChannelError, ChannelListing, ClientConfig, ErrorKind, Exchange,
    PayloadPolicy, PipeBackend, PipeClient,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ToolError};

/// Prefix of every failure result except payload validation.
pub const ERROR_MARKER: &str = "[Error]";
/// Prefix of a result rejected before any connection attempt.
pub const VALIDATION_ERROR_MARKER: &str = "[ValidationError]";
/// `pipe_list` result when the namespace is empty.
pub const NO_PIPES_MESSAGE: &str = "No named pipes available.";

/// Whether a tool result reports a failure.
pub fn is_failure(result: &str) -> bool {
    result.starts_with(ERROR_MARKER) || result.starts_with(VALIDATION_ERROR_MARKER)
}

fn default_read_response() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SendArgs {
    pipe_name: String,
    message: String,
    #[serde(default = "default_read_response")]
    read_response: bool,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WriteOnlyArgs {
    pipe_name: String,
    message: String,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ExistsArgs {
    pipe_name: String,
}

/// The pipe tool set. Every operation returns a string, success or not.
pub struct PipeTools<B: PipeBackend> {
    client: PipeClient<B>,
    directory: ChannelDirectory<B>,
}

impl<B: PipeBackend> PipeTools<B> {
    /// Messages sent through tools are always checked as JSON, whatever
    /// `config.payload_policy` says.
    pub fn new(backend: Arc<B>, config: ClientConfig) -> Self {
        let config = ClientConfig {
            payload_policy: PayloadPolicy::Json,
            ..config
        };
        Self {
            client: PipeClient::with_config(Arc::clone(&backend), config),
            directory: ChannelDirectory::new(backend),
        }
    }

    /// Send a message and, if `read_response`, return the server's reply.
    pub fn pipe_send(
        &self,
        pipe_name: &str,
        message: &str,
        read_response: bool,
        timeout_ms: Option<u64>,
    ) -> String {
        let timeout = self.timeout(timeout_ms);
        match self.client.send(pipe_name, message, read_response, timeout) {
            Ok(Exchange::Response(text)) => text,
            Ok(Exchange::Sent { bytes }) => format!("Success: {bytes} bytes sent"),
            Err(err) => format_error(&err),
        }
    }

    /// Fire-and-forget send.
    pub fn pipe_write_only(
        &self,
        pipe_name: &str,
        message: &str,
        timeout_ms: Option<u64>,
    ) -> String {
        self.pipe_send(pipe_name, message, false, timeout_ms)
    }

    /// Newline-separated sorted pipe names.
    pub fn pipe_list(&self) -> String {
        match self.directory.list() {
            Ok(ChannelListing::Empty) => NO_PIPES_MESSAGE.to_string(),
            Ok(ChannelListing::Channels(names)) => names.join("\n"),
            Err(err) => format_error(&err),
        }
    }

    /// `exists` or `not found`.
    pub fn pipe_exists(&self, pipe_name: &str) -> String {
        match self.directory.exists(pipe_name) {
            Ok(true) => "exists".to_string(),
            Ok(false) => "not found".to_string(),
            Err(err) => format_error(&err),
        }
    }

    /// Dispatch a call by wire name with JSON arguments.
    pub fn call(&self, tool: &str, arguments: Value) -> Result<String> {
        debug!(tool, "tool call");
        match tool {
            "pipe_send" => {
                let args: SendArgs = parse_args(tool, arguments)?;
                Ok(self.pipe_send(
                    &args.pipe_name,
                    &args.message,
                    args.read_response,
                    args.timeout_ms,
                ))
            }
            "pipe_write_only" => {
                let args: WriteOnlyArgs = parse_args(tool, arguments)?;
                Ok(self.pipe_write_only(&args.pipe_name, &args.message, args.timeout_ms))
            }
            "pipe_list" => Ok(self.pipe_list()),
            "pipe_exists" => {
                let args: ExistsArgs = parse_args(tool, arguments)?;
                Ok(self.pipe_exists(&args.pipe_name))
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    fn timeout(&self, timeout_ms: Option<u64>) -> Duration {
        timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.client.config().default_timeout)
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(tool: &str, arguments: Value) -> Result<T> {
    // A missing "arguments" member arrives as null; treat it as no arguments.
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Render a channel error as a marked tool result.
pub fn format_error(err: &ChannelError) -> String {
    match err.kind() {
        ErrorKind::Validation => format!("{VALIDATION_ERROR_MARKER} {err}"),
        _ => format!("{ERROR_MARKER} {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_get_their_own_marker() {
        let parse_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let text = format_error(&ChannelError::from(parse_err));
        assert!(text.starts_with("[ValidationError] message is not valid JSON"));
        assert!(is_failure(&text));
    }

    #[test]
    fn io_errors_use_error_marker_and_code() {
        let err = ChannelError::Unavailable {
            name: r"\\.\pipe\svc".to_string(),
            source: std::io::Error::from_raw_os_error(2),
        };
        let text = format_error(&err);
        assert!(text.starts_with("[Error] pipe \\\\.\\pipe\\svc unavailable"));
        assert!(text.contains("os error 2"));
    }

    #[test]
    fn plain_text_is_not_failure() {
        assert!(!is_failure("exists"));
        assert!(!is_failure("Success: 3 bytes sent"));
        assert!(!is_failure(" [Error] leading space is a response"));
    }

    #[cfg(unix)]
    mod unix {
        use std::io::{Read, Write};
        use std::os::unix::net::UnixListener;
        use std::path::{Path, PathBuf};

        use pipebridge_channel::UnixBackend;

        use super::*;

        fn unique_dir(tag: &str) -> PathBuf {
            let dir = std::env::temp_dir().join(format!(
                "pbt-{tag}-{}-{}",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("time should be after epoch")
                    .as_nanos()
            ));
            std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
            dir
        }

        fn tools(dir: &Path) -> PipeTools<UnixBackend> {
            PipeTools::new(Arc::new(UnixBackend::new(dir)), ClientConfig::default())
        }

        #[test]
        fn send_returns_response_text() {
            let dir = unique_dir("send");
            let listener = UnixListener::bind(dir.join("svc")).unwrap();
            let server = std::thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 1024];
                let n = stream.read(&mut buf).unwrap();
                stream.write_all(&buf[..n]).unwrap();
            });

            let result = tools(&dir).pipe_send("svc", r#"{"ping":true}"#, true, Some(1000));
            assert_eq!(result, r#"{"ping":true}"#);
            server.join().unwrap();
            let _ = std::fs::remove_dir_all(&dir);
        }

        #[test]
        fn write_only_reports_byte_count() {
            let dir = unique_dir("write");
            let listener = UnixListener::bind(dir.join("svc")).unwrap();
            let server = std::thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut sink = Vec::new();
                stream.read_to_end(&mut sink).unwrap();
            });

            let result = tools(&dir).pipe_write_only("svc", "[1,2]", Some(1000));
            assert_eq!(result, "Success: 5 bytes sent");
            server.join().unwrap();
            let _ = std::fs::remove_dir_all(&dir);
        }

        #[test]
        fn malformed_json_is_validation_error() {
            let dir = unique_dir("invalid");
            let result = tools(&dir).pipe_send("svc", "{not json", true, Some(10));
            assert!(result.starts_with(VALIDATION_ERROR_MARKER), "{result}");
            let _ = std::fs::remove_dir_all(&dir);
        }

        #[test]
        fn missing_pipe_is_error() {
            let dir = unique_dir("missing");
            let result = tools(&dir).pipe_send("svc", "{}", true, Some(50));
            assert!(result.starts_with(ERROR_MARKER), "{result}");
            let _ = std::fs::remove_dir_all(&dir);
        }

        #[test]
        fn list_and_exists() {
            let dir = unique_dir("list");
            let tools = tools(&dir);
            assert_eq!(tools.pipe_list(), NO_PIPES_MESSAGE);
            assert_eq!(tools.pipe_exists("b"), "not found");

            let _b = UnixListener::bind(dir.join("b")).unwrap();
            let _a = UnixListener::bind(dir.join("a")).unwrap();
            assert_eq!(tools.pipe_list(), "a\nb");
            assert_eq!(tools.pipe_exists(r"\\.\pipe\b"), "exists");
            let _ = std::fs::remove_dir_all(&dir);
        }

        #[test]
        fn call_dispatches_by_wire_name() {
            let dir = unique_dir("call");
            let tools = tools(&dir);
            let text = tools
                .call("pipe_exists", serde_json::json!({ "pipe_name": "x" }))
                .unwrap();
            assert_eq!(text, "not found");
            assert_eq!(tools.call("pipe_list", Value::Null).unwrap(), NO_PIPES_MESSAGE);

            assert!(matches!(
                tools.call("pipe_send", serde_json::json!({ "pipe_name": "x" })),
                Err(ToolError::InvalidArguments { .. })
            ));
            assert!(matches!(
                tools.call("run_shell", Value::Null),
                Err(ToolError::UnknownTool(_))
            ));
            let _ = std::fs::remove_dir_all(&dir);
        }
    }
}
