use pipebridge_channel::ChannelDirectory;

use crate::cmd::{Context, ListArgs};
use crate::exit::{channel_error, CliResult, SUCCESS};
use crate::output::print_listing;

pub fn run(_args: ListArgs, ctx: &Context) -> CliResult<i32> {
    let listing = ChannelDirectory::new(ctx.backend())
        .list()
        .map_err(|err| channel_error("list failed", err))?;
    print_listing(&listing, ctx.format);
    Ok(SUCCESS)
}
