use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::os::windows::ffi::OsStrExt;
use std::ptr;
use std::time::Duration;

use tracing::debug;
use windows_sys::Win32::Foundation::{
    CloseHandle, ERROR_MORE_DATA, GENERIC_READ, GENERIC_WRITE, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FlushFileBuffers, ReadFile, WriteFile, OPEN_EXISTING,
};
use windows_sys::Win32::System::Pipes::WaitNamedPipeW;

use crate::backend::PipeBackend;
use crate::name::{ChannelName, CANONICAL_PREFIX};

/// Win32 named-pipe client backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsBackend;

/// An open client end of a named pipe. Closed on drop.
#[derive(Debug)]
pub struct PipeHandle {
    raw: HANDLE,
}

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(Some(0)).collect()
}

/// `WaitNamedPipeW` reads 0 as "server default" and `u32::MAX` as forever.
fn wait_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis())
        .unwrap_or(u32::MAX - 1)
        .clamp(1, u32::MAX - 1)
}

impl PipeBackend for WindowsBackend {
    type Handle = PipeHandle;

    fn wait_available(&self, name: &ChannelName, timeout: Duration) -> io::Result<()> {
        let wide = to_wide(name.as_str());
        // SAFETY: `wide` is a NUL-terminated UTF-16 buffer that outlives the call.
        let ok = unsafe { WaitNamedPipeW(wide.as_ptr(), wait_millis(timeout)) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn open(&self, name: &ChannelName) -> io::Result<PipeHandle> {
        let wide = to_wide(name.as_str());
        // SAFETY: `wide` is NUL-terminated; null security attributes and
        // template handle are documented as valid for CreateFileW.
        let raw = unsafe {
            CreateFileW(
                wide.as_ptr(),
                GENERIC_READ | GENERIC_WRITE,
                0,
                ptr::null(),
                OPEN_EXISTING,
                0,
                ptr::null_mut(),
            )
        };
        if raw == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }
        debug!(pipe = %name, "opened named pipe handle");
        Ok(PipeHandle { raw })
    }

    fn enumerate(&self) -> io::Result<Vec<String>> {
        std::fs::read_dir(CANONICAL_PREFIX)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect()
    }

    fn transport_name(&self) -> &'static str {
        "windows-named-pipe"
    }
}

impl Write for PipeHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut written = 0u32;
        // SAFETY: `buf` is valid for `len` bytes, `written` is a writable u32,
        // and the handle was opened for synchronous (non-overlapped) I/O.
        let ok = unsafe { WriteFile(self.raw, buf.as_ptr(), len, &mut written, ptr::null_mut()) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(written as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        // SAFETY: `raw` is an open handle owned by this value.
        let ok = unsafe { FlushFileBuffers(self.raw) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Read for PipeHandle {
    /// A message larger than `buf` is truncated to what fits.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut read = 0u32;
        // SAFETY: `buf` is valid for `len` writable bytes and `read` is a
        // writable u32; synchronous handle, so no OVERLAPPED is required.
        let ok = unsafe { ReadFile(self.raw, buf.as_mut_ptr(), len, &mut read, ptr::null_mut()) };
        if ok == 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(ERROR_MORE_DATA as i32) {
                return Err(err);
            }
        }
        Ok(read as usize)
    }
}

impl Drop for PipeHandle {
    fn drop(&mut self) {
        // SAFETY: `raw` came from CreateFileW, is valid, and is closed exactly once here.
        unsafe {
            CloseHandle(self.raw);
        }
    }
}
