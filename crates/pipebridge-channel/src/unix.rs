use std::io;
use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::backend::PipeBackend;
use crate::name::ChannelName;

/// Unix stand-in for the Windows pipe namespace.
///
/// Each pipe is a Unix domain socket named after the bare pipe name inside
/// one directory, so `\\.\pipe\svc` maps to `<dir>/svc`. Servers bind the
/// socket; this backend only connects and lists.
#[derive(Debug, Clone)]
pub struct UnixBackend {
    dir: PathBuf,
    poll_interval: Duration,
}

impl UnixBackend {
    /// Directory name used under the system temp dir when none is given.
    pub const DEFAULT_DIR_NAME: &'static str = "pipebridge";
    const POLL_INTERVAL: Duration = Duration::from_millis(50);

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            poll_interval: Self::POLL_INTERVAL,
        }
    }

    /// Namespace directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Socket path a pipe name maps to.
    pub fn socket_path(&self, name: &ChannelName) -> PathBuf {
        self.dir.join(name.bare())
    }
}

impl Default for UnixBackend {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join(Self::DEFAULT_DIR_NAME))
    }
}

impl PipeBackend for UnixBackend {
    type Handle = UnixStream;

    /// Polls until the socket file shows up. Fails with `ETIMEDOUT` if it
    /// never does.
    fn wait_available(&self, name: &ChannelName, timeout: Duration) -> io::Result<()> {
        let path = self.socket_path(name);
        let deadline = Instant::now() + timeout;

        loop {
            match std::fs::metadata(&path) {
                Ok(metadata) if metadata.file_type().is_socket() => return Ok(()),
                Ok(_) => return Err(io::Error::from_raw_os_error(libc::ENOTSOCK)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(io::Error::from_raw_os_error(libc::ETIMEDOUT));
                    }
                    std::thread::sleep(self.poll_interval.min(deadline - now));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn open(&self, name: &ChannelName) -> io::Result<UnixStream> {
        let path = self.socket_path(name);
        let stream = UnixStream::connect(&path)?;
        debug!(?path, "connected to unix domain socket");
        Ok(stream)
    }

    /// A namespace directory that does not exist yet is empty.
    fn enumerate(&self) -> io::Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_socket() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn transport_name(&self) -> &'static str {
        "unix-domain-socket"
    }
}
