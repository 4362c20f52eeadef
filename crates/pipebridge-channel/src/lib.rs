//! Named-pipe client primitives.
//!
//! Everything needed to talk to a pipe server that somebody else owns:
//! - [`resolve`] turns a short name or full path into a [`ChannelName`]
//! - [`PipeClient`] runs one connect/write/read/close exchange per call
//! - [`ChannelDirectory`] enumerates the pipe namespace
//!
//! Platform access goes through the [`PipeBackend`] trait. On Windows the
//! backend talks to `\\.\pipe\` directly; on Unix the namespace is a
//! directory of Unix domain sockets.

pub mod backend;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod name;

#[cfg(unix)]
pub mod unix;
#[cfg(windows)]
pub mod windows;

pub use backend::{PipeBackend, PlatformBackend};
pub use client::{Exchange, PipeClient};
pub use config::{ClientConfig, PayloadPolicy, DEFAULT_READ_BUFFER_SIZE, DEFAULT_TIMEOUT};
pub use directory::{ChannelDirectory, ChannelListing};
pub use error::{ChannelError, ErrorKind, Result};
pub use name::{resolve, ChannelName, CANONICAL_PREFIX};

#[cfg(unix)]
pub use unix::UnixBackend;
#[cfg(windows)]
pub use windows::WindowsBackend;

#[cfg(test)]
mod testing;
