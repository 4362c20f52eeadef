use serde::Serialize;

use pipebridge_channel::{ChannelDirectory, PipeBackend};

use crate::cmd::{Context, DoctorArgs};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, ctx: &Context) -> CliResult<i32> {
    let backend = ctx.backend();
    let checks = vec![
        CheckResult {
            name: "platform_backend".to_string(),
            status: CheckStatus::Info,
            detail: backend.transport_name().to_string(),
        },
        pipe_dir_check(ctx),
        namespace_check(ChannelDirectory::new(backend)),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let output = DoctorOutput {
        schema_id: "https://schemas.3leaps.dev/pipebridge/cli/v1/doctor-report.schema.json",
        checks,
        overall: if has_fail { "fail" } else { "pass" },
    };

    print_doctor(&output, ctx.format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn namespace_check<B: PipeBackend>(directory: ChannelDirectory<B>) -> CheckResult {
    match directory.list() {
        Ok(listing) => CheckResult {
            name: "namespace_listable".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{} pipe(s) visible", listing.names().len()),
        },
        Err(err) => CheckResult {
            name: "namespace_listable".to_string(),
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}

#[cfg(unix)]
fn pipe_dir_check(ctx: &Context) -> CheckResult {
    let backend = ctx.backend();
    let dir = backend.dir();
    let (status, detail) = if dir.is_dir() {
        (CheckStatus::Pass, format!("{} exists", dir.display()))
    } else if dir.exists() {
        (CheckStatus::Fail, format!("{} is not a directory", dir.display()))
    } else {
        (
            CheckStatus::Warn,
            format!("{} does not exist; namespace is empty", dir.display()),
        )
    };

    CheckResult {
        name: "pipe_dir".to_string(),
        status,
        detail,
    }
}

#[cfg(windows)]
fn pipe_dir_check(ctx: &Context) -> CheckResult {
    let detail = match &ctx.pipe_dir {
        Some(dir) => format!("{} ignored; using \\\\.\\pipe\\", dir.display()),
        None => "using \\\\.\\pipe\\".to_string(),
    };
    CheckResult {
        name: "pipe_dir".to_string(),
        status: CheckStatus::Info,
        detail,
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("pipebridge doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<20} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
    }
}
