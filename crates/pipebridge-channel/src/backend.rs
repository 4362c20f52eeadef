use std::io::{self, Read, Write};
use std::time::Duration;

use crate::name::ChannelName;

/// Platform access used by the client and the directory.
///
/// One backend value is shared (read-only) by every exchange in the process.
/// Errors are plain `io::Error`s; `raw_os_error()` carries the platform code.
pub trait PipeBackend: Send + Sync {
    /// An open connection to one pipe instance. Dropping it releases the
    /// OS handle.
    type Handle: Read + Write;

    /// Block until an instance of `name` can accept a connection, or fail
    /// once `timeout` expires or the pipe is known not to exist.
    fn wait_available(&self, name: &ChannelName, timeout: Duration) -> io::Result<()>;

    /// Open an existing pipe for reading and writing. Never creates one.
    fn open(&self, name: &ChannelName) -> io::Result<Self::Handle>;

    /// Names currently present in the pipe namespace, in no particular order.
    fn enumerate(&self) -> io::Result<Vec<String>>;

    /// Transport name for diagnostics.
    fn transport_name(&self) -> &'static str;
}

/// Backend for the platform this crate was built for.
#[cfg(unix)]
pub type PlatformBackend = crate::unix::UnixBackend;

/// Backend for the platform this crate was built for.
#[cfg(windows)]
pub type PlatformBackend = crate::windows::WindowsBackend;
