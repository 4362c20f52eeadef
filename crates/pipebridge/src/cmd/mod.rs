use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use pipebridge_channel::PlatformBackend;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod doctor;
pub mod exists;
pub mod list;
pub mod resolve;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a message and print the response.
    Send(SendArgs),
    /// Send a message without waiting for a response.
    Write(WriteArgs),
    /// List pipes in the namespace.
    List(ListArgs),
    /// Check whether a pipe exists.
    Exists(ExistsArgs),
    /// Print the canonical form of a pipe name.
    Resolve(ResolveArgs),
    /// Serve the pipe tools as JSON-RPC over stdio.
    Serve(ServeArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    pub format: OutputFormat,
    pub pipe_dir: Option<PathBuf>,
}

impl Context {
    /// Platform backend honoring `--pipe-dir`.
    pub fn backend(&self) -> Arc<PlatformBackend> {
        #[cfg(unix)]
        {
            Arc::new(match &self.pipe_dir {
                Some(dir) => pipebridge_channel::UnixBackend::new(dir),
                None => pipebridge_channel::UnixBackend::default(),
            })
        }

        #[cfg(windows)]
        {
            if let Some(dir) = &self.pipe_dir {
                tracing::warn!(dir = %dir.display(), "--pipe-dir has no effect on Windows");
            }
            Arc::new(pipebridge_channel::WindowsBackend)
        }
    }
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, ctx),
        Command::Write(args) => send::run_write(args, ctx),
        Command::List(args) => list::run(args, ctx),
        Command::Exists(args) => exists::run(args, ctx),
        Command::Resolve(args) => resolve::run(args, ctx),
        Command::Serve(args) => serve::run(args, ctx),
        Command::Doctor(args) => doctor::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// JSON payload; rejected before connecting if malformed.
    #[arg(long)]
    pub json: Option<String>,
    /// Raw text payload, sent without validation.
    #[arg(long)]
    pub data: Option<String>,
    /// Read a UTF-8 payload from file, sent without validation.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Pipe name or full path (\\.\pipe\NAME).
    pub pipe: String,
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Do not wait for a response.
    #[arg(long)]
    pub no_wait: bool,
    /// Maximum time to wait for a free pipe instance (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
    /// Size of the response read buffer in bytes.
    #[arg(long, default_value_t = pipebridge_channel::DEFAULT_READ_BUFFER_SIZE)]
    pub read_buffer: usize,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Pipe name or full path (\\.\pipe\NAME).
    pub pipe: String,
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Maximum time to wait for a free pipe instance (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {}

#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Pipe name or full path.
    pub pipe: String,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Pipe name or full path.
    pub pipe: String,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Default wait for a free pipe instance when a call gives no timeout_ms (e.g. 5s).
    #[arg(long, default_value = "5s")]
    pub default_timeout: String,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
