use pipebridge_channel::{resolve, ChannelDirectory};

use crate::cmd::{Context, ExistsArgs};
use crate::exit::{channel_error, CliResult, FAILURE, SUCCESS};
use crate::output::print_exists;

/// Exits 0 when the pipe exists and 1 when it does not.
pub fn run(args: ExistsArgs, ctx: &Context) -> CliResult<i32> {
    let exists = ChannelDirectory::new(ctx.backend())
        .exists(&args.pipe)
        .map_err(|err| channel_error("existence check failed", err))?;
    print_exists(&resolve(&args.pipe), exists, ctx.format);
    Ok(if exists { SUCCESS } else { FAILURE })
}
