use std::io;

use pipebridge_channel::ClientConfig;
use pipebridge_tools::{PipeTools, ToolServer};

use crate::cmd::send::parse_duration;
use crate::cmd::{Context, ServeArgs};
use crate::exit::{tool_error, CliResult, SUCCESS};

/// Runs until stdin closes. Responses go to stdout, logs to stderr.
pub fn run(args: ServeArgs, ctx: &Context) -> CliResult<i32> {
    let config = ClientConfig {
        default_timeout: parse_duration(&args.default_timeout)?,
        ..ClientConfig::default()
    };
    let server = ToolServer::new(PipeTools::new(ctx.backend(), config))
        .with_server_info("pipebridge", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let stdout = io::stdout();
    server
        .serve(stdin.lock(), stdout.lock())
        .map_err(|err| tool_error("tool server failed", err))?;
    Ok(SUCCESS)
}
