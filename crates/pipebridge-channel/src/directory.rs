use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::PipeBackend;
use crate::error::{ChannelError, Result};
use crate::name::resolve;

/// Snapshot of the pipe namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelListing {
    /// The namespace was listed and holds no pipes.
    Empty,
    /// Pipe names (bare form), sorted.
    Channels(Vec<String>),
}

impl ChannelListing {
    pub fn names(&self) -> &[String] {
        match self {
            ChannelListing::Empty => &[],
            ChannelListing::Channels(names) => names.as_slice(),
        }
    }

    pub fn contains(&self, bare_name: &str) -> bool {
        self.names().iter().any(|name| name == bare_name)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChannelListing::Empty)
    }
}

/// Read-only view of the pipe namespace.
pub struct ChannelDirectory<B: PipeBackend> {
    backend: Arc<B>,
}

impl<B: PipeBackend> ChannelDirectory<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// List every pipe currently visible, sorted lexicographically.
    pub fn list(&self) -> Result<ChannelListing> {
        let mut names = self.backend.enumerate().map_err(|err| {
            warn!(
                error = %err,
                transport = self.backend.transport_name(),
                "pipe enumeration failed"
            );
            ChannelError::EnumerationFailed(err)
        })?;
        debug!(count = names.len(), "enumerated pipe namespace");

        if names.is_empty() {
            return Ok(ChannelListing::Empty);
        }
        names.sort();
        Ok(ChannelListing::Channels(names))
    }

    /// Whether `name` is in the namespace right now.
    ///
    /// The answer can be stale by the time the caller acts on it; a
    /// following send may still find the pipe gone.
    pub fn exists(&self, name: &str) -> Result<bool> {
        let name = resolve(name);
        Ok(self.list()?.contains(name.bare()))
    }
}

impl<B: PipeBackend> Clone for ChannelDirectory<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}
