use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::backend::PipeBackend;
use crate::config::{ClientConfig, PayloadPolicy};
use crate::error::{ChannelError, Result};
use crate::name::{resolve, ChannelName};

/// Successful outcome of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// Text read back from the server, decoded lossily as UTF-8.
    Response(String),
    /// The message was written and flushed; no response was requested.
    Sent { bytes: usize },
}

/// One-shot named-pipe client.
///
/// Every call to [`send`](Self::send) opens its own handle and releases it
/// before returning. Nothing is pooled, so a client can be shared freely
/// across threads.
pub struct PipeClient<B: PipeBackend> {
    backend: Arc<B>,
    config: ClientConfig,
}

impl<B: PipeBackend> PipeClient<B> {
    /// Create a client with default configuration.
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_config(backend, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(backend: Arc<B>, config: ClientConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `message` to the pipe `name` and optionally read one response.
    ///
    /// Steps: validate, wait for a free instance (up to `timeout`), open,
    /// write, flush, read once if `wait_for_response`. The handle is closed
    /// on every path. Only the wait is bounded by `timeout`; a server that
    /// never answers blocks the read.
    pub fn send(
        &self,
        name: &str,
        message: &str,
        wait_for_response: bool,
        timeout: Duration,
    ) -> Result<Exchange> {
        if self.config.payload_policy == PayloadPolicy::Json {
            serde_json::from_str::<serde_json::Value>(message)?;
        }

        let name = resolve(name);
        debug!(pipe = %name, timeout_ms = timeout.as_millis() as u64, "waiting for pipe");
        self.backend
            .wait_available(&name, timeout)
            .map_err(|source| {
                warn!(pipe = %name, error = %source, "pipe wait failed");
                ChannelError::Unavailable {
                    name: name.to_string(),
                    source,
                }
            })?;

        let mut handle = self.backend.open(&name).map_err(|source| {
            warn!(pipe = %name, error = %source, "pipe open failed");
            ChannelError::ConnectFailed {
                name: name.to_string(),
                source,
            }
        })?;
        debug!(pipe = %name, transport = self.backend.transport_name(), "connected to pipe");

        let outcome = self.exchange(&name, &mut handle, message.as_bytes(), wait_for_response);
        drop(handle);
        debug!(pipe = %name, ok = outcome.is_ok(), "pipe handle released");
        outcome
    }

    /// [`send`](Self::send) without reading a response.
    pub fn send_one_way(&self, name: &str, message: &str, timeout: Duration) -> Result<Exchange> {
        self.send(name, message, false, timeout)
    }

    fn exchange(
        &self,
        name: &ChannelName,
        handle: &mut B::Handle,
        data: &[u8],
        wait_for_response: bool,
    ) -> Result<Exchange> {
        let write_failed = |source: io::Error| {
            warn!(pipe = %name, error = %source, "pipe write failed");
            ChannelError::WriteFailed {
                name: name.to_string(),
                source,
            }
        };

        let written = handle.write(data).map_err(write_failed)?;
        if written != data.len() {
            return Err(write_failed(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {written} of {} bytes", data.len()),
            )));
        }
        handle.flush().map_err(write_failed)?;
        debug!(pipe = %name, bytes = written, "message written");

        if !wait_for_response {
            return Ok(Exchange::Sent { bytes: written });
        }

        // TODO: bound this read; a silent server blocks the caller forever
        // (needs overlapped ReadFile on Windows, SO_RCVTIMEO on Unix).
        let mut buf = vec![0u8; self.config.read_buffer_size];
        let read = handle.read(&mut buf).map_err(|source| {
            warn!(pipe = %name, error = %source, "pipe read failed");
            ChannelError::ReadFailed {
                name: name.to_string(),
                source,
            }
        })?;
        debug!(pipe = %name, bytes = read, "response read");

        Ok(Exchange::Response(
            String::from_utf8_lossy(&buf[..read]).into_owned(),
        ))
    }
}

impl<B: PipeBackend> Clone for PipeClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config,
        }
    }
}
