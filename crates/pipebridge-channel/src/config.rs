use std::time::Duration;

/// Default wait for a free pipe instance.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Size of the single response read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// How outgoing messages are checked before connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadPolicy {
    /// Message must parse as JSON; malformed input never reaches the pipe.
    #[default]
    Json,
    /// Any UTF-8 text is sent as-is.
    Text,
}

/// Controls exchange behavior of a [`crate::PipeClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Wait used when the caller does not pass a timeout.
    pub default_timeout: Duration,
    /// Bytes requested by the one read that collects a response.
    /// Longer responses are truncated.
    pub read_buffer_size: usize,
    /// Pre-connection payload check.
    pub payload_policy: PayloadPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            payload_policy: PayloadPolicy::Json,
        }
    }
}
