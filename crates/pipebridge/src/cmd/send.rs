use std::fs;
use std::time::Duration;

use pipebridge_channel::{resolve, ClientConfig, PayloadPolicy, PipeClient};

use crate::cmd::{Context, PayloadArgs, SendArgs, WriteArgs};
use crate::exit::{channel_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::print_exchange;

pub fn run(args: SendArgs, ctx: &Context) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let config = ClientConfig {
        read_buffer_size: args.read_buffer,
        ..ClientConfig::default()
    };
    exchange(&args.pipe, &args.payload, !args.no_wait, timeout, config, ctx)
}

pub fn run_write(args: WriteArgs, ctx: &Context) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    exchange(
        &args.pipe,
        &args.payload,
        false,
        timeout,
        ClientConfig::default(),
        ctx,
    )
}

fn exchange(
    pipe: &str,
    payload: &PayloadArgs,
    wait_for_response: bool,
    timeout: Duration,
    config: ClientConfig,
    ctx: &Context,
) -> CliResult<i32> {
    let (message, policy) = resolve_payload(payload)?;
    let client = PipeClient::with_config(
        ctx.backend(),
        ClientConfig {
            payload_policy: policy,
            ..config
        },
    );

    let result = client
        .send(pipe, &message, wait_for_response, timeout)
        .map_err(|err| channel_error("send failed", err))?;
    print_exchange(&resolve(pipe), &result, ctx.format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &PayloadArgs) -> CliResult<(String, PayloadPolicy)> {
    if let Some(json) = &args.json {
        return Ok((json.clone(), PayloadPolicy::Json));
    }
    if let Some(data) = &args.data {
        return Ok((data.clone(), PayloadPolicy::Text));
    }
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return Ok((text, PayloadPolicy::Text));
    }
    Err(CliError::new(USAGE, "one of --json, --data or --file is required"))
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
