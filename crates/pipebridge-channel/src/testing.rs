//! In-memory backend with call counters and per-step failure injection.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::PipeBackend;
use crate::name::ChannelName;

pub(crate) const FAKE_OS_CODE: i32 = 231;

#[derive(Debug, Default)]
pub(crate) struct Calls {
    pub waits: AtomicUsize,
    pub open_attempts: AtomicUsize,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub flushes: AtomicUsize,
    pub reads: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailAt {
    Wait,
    Open,
    Write,
    ShortWrite,
    Flush,
    Read,
}

pub(crate) struct FakeBackend {
    pub calls: Arc<Calls>,
    fail_at: Option<FailAt>,
    response: Vec<u8>,
    pipes: Option<Vec<String>>,
    sent: Arc<Mutex<Vec<u8>>>,
    last_name: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            fail_at: None,
            response: Vec::new(),
            pipes: Some(Vec::new()),
            sent: Arc::new(Mutex::new(Vec::new())),
            last_name: Mutex::new(None),
        }
    }

    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn with_response(mut self, response: &[u8]) -> Self {
        self.response = response.to_vec();
        self
    }

    pub fn with_pipes(mut self, pipes: &[&str]) -> Self {
        self.pipes = Some(pipes.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Enumeration fails with permission denied.
    pub fn without_namespace(mut self) -> Self {
        self.pipes = None;
        self
    }

    pub fn sent(&self) -> Vec<u8> {
        self.sent.lock().expect("sent lock").clone()
    }

    pub fn last_name(&self) -> Option<String> {
        self.last_name.lock().expect("name lock").clone()
    }

    fn fails(&self, step: FailAt) -> bool {
        self.fail_at == Some(step)
    }
}

fn os_error() -> io::Error {
    io::Error::from_raw_os_error(FAKE_OS_CODE)
}

impl PipeBackend for FakeBackend {
    type Handle = FakeHandle;

    fn wait_available(&self, name: &ChannelName, _timeout: Duration) -> io::Result<()> {
        self.calls.waits.fetch_add(1, Ordering::SeqCst);
        *self.last_name.lock().expect("name lock") = Some(name.to_string());
        if self.fails(FailAt::Wait) {
            return Err(os_error());
        }
        Ok(())
    }

    fn open(&self, _name: &ChannelName) -> io::Result<FakeHandle> {
        self.calls.open_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fails(FailAt::Open) {
            return Err(os_error());
        }
        self.calls.opens.fetch_add(1, Ordering::SeqCst);
        Ok(FakeHandle {
            calls: Arc::clone(&self.calls),
            fail_at: self.fail_at,
            response: self.response.clone(),
            sent: Arc::clone(&self.sent),
        })
    }

    fn enumerate(&self) -> io::Result<Vec<String>> {
        self.pipes.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::PermissionDenied, "namespace not readable")
        })
    }

    fn transport_name(&self) -> &'static str {
        "fake"
    }
}

pub(crate) struct FakeHandle {
    calls: Arc<Calls>,
    fail_at: Option<FailAt>,
    response: Vec<u8>,
    sent: Arc<Mutex<Vec<u8>>>,
}

impl Write for FakeHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.fail_at {
            Some(FailAt::Write) => Err(os_error()),
            Some(FailAt::ShortWrite) => {
                let half = buf.len() / 2;
                self.sent.lock().expect("sent lock").extend_from_slice(&buf[..half]);
                Ok(half)
            }
            _ => {
                self.sent.lock().expect("sent lock").extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.calls.flushes.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(FailAt::Flush) {
            return Err(os_error());
        }
        Ok(())
    }
}

impl Read for FakeHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(FailAt::Read) {
            return Err(os_error());
        }
        let n = self.response.len().min(buf.len());
        buf[..n].copy_from_slice(&self.response[..n]);
        Ok(n)
    }
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
    }
}
