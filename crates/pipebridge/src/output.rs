use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pipebridge_channel::{ChannelListing, ChannelName, Exchange};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Raw
        }
    }
}

#[derive(Serialize)]
struct ExchangeOutput<'a> {
    schema_id: &'a str,
    pipe: &'a str,
    outcome: &'a str,
    bytes_sent: Option<usize>,
    response: Option<&'a str>,
}

pub fn print_exchange(pipe: &ChannelName, exchange: &Exchange, format: OutputFormat) {
    let (outcome, bytes_sent, response) = match exchange {
        Exchange::Response(text) => ("response", None, Some(text.as_str())),
        Exchange::Sent { bytes } => ("sent", Some(*bytes), None),
    };

    match format {
        OutputFormat::Json => {
            let out = ExchangeOutput {
                schema_id: "https://schemas.3leaps.dev/pipebridge/cli/v1/exchange-result.schema.json",
                pipe: pipe.as_str(),
                outcome,
                bytes_sent,
                response,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PIPE", "OUTCOME", "DETAIL"])
                .add_row(vec![
                    pipe.to_string(),
                    outcome.to_string(),
                    detail(bytes_sent, response),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("pipe={pipe} outcome={outcome} {}", detail(bytes_sent, response));
        }
        OutputFormat::Raw => match exchange {
            Exchange::Response(text) => print_raw(text.as_bytes()),
            Exchange::Sent { bytes } => println!("{bytes}"),
        },
    }
}

fn detail(bytes_sent: Option<usize>, response: Option<&str>) -> String {
    match (bytes_sent, response) {
        (Some(bytes), _) => format!("{bytes} bytes sent"),
        (None, Some(text)) => text.to_string(),
        (None, None) => String::new(),
    }
}

#[derive(Serialize)]
struct ListingOutput<'a> {
    schema_id: &'a str,
    count: usize,
    pipes: &'a [String],
}

pub fn print_listing(listing: &ChannelListing, format: OutputFormat) {
    let names = listing.names();
    match format {
        OutputFormat::Json => print_json(&ListingOutput {
            schema_id: "https://schemas.3leaps.dev/pipebridge/cli/v1/pipe-list.schema.json",
            count: names.len(),
            pipes: names,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PIPE"]);
            for name in names {
                table.add_row(vec![name.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            if listing.is_empty() {
                println!("{}", pipebridge_tools::NO_PIPES_MESSAGE);
            }
            for name in names {
                println!("{name}");
            }
        }
    }
}

#[derive(Serialize)]
struct ExistsOutput<'a> {
    schema_id: &'a str,
    pipe: &'a str,
    exists: bool,
}

pub fn print_exists(pipe: &ChannelName, exists: bool, format: OutputFormat) {
    let verdict = if exists { "exists" } else { "not found" };
    match format {
        OutputFormat::Json => print_json(&ExistsOutput {
            schema_id: "https://schemas.3leaps.dev/pipebridge/cli/v1/pipe-exists.schema.json",
            pipe: pipe.as_str(),
            exists,
        }),
        OutputFormat::Table | OutputFormat::Pretty => println!("{pipe}: {verdict}"),
        OutputFormat::Raw => println!("{verdict}"),
    }
}

#[derive(Serialize)]
struct ResolvedOutput<'a> {
    canonical: &'a str,
    bare: &'a str,
}

pub fn print_resolved(name: &ChannelName, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ResolvedOutput {
            canonical: name.as_str(),
            bare: name.bare(),
        }),
        _ => println!("{name}"),
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
