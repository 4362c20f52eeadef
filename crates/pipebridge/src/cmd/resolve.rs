use crate::cmd::{Context, ResolveArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::print_resolved;

pub fn run(args: ResolveArgs, ctx: &Context) -> CliResult<i32> {
    print_resolved(&pipebridge_channel::resolve(&args.pipe), ctx.format);
    Ok(SUCCESS)
}
