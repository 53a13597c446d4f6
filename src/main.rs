// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use binder::{
    config::Config,
    constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_DNS_RECORD_TTL_SECS, LOG_FORMAT_ENV},
    orchestrator::UpdateOrchestrator,
    report::TransactionReport,
    reverse::reverse_name,
    update::{generate_tsig_key, key_file_contents, FixedPort, ServerRegistry, ServerTable},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hickory_client::rr::RecordType;
use tracing::{debug, error, info};

/// Send TSIG-signed dynamic updates (RFC 2136) to a nameserver.
#[derive(Parser, Debug)]
#[command(name = "binder", version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalOptions {
    /// Configuration file with servers and TSIG keys
    #[arg(long, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Send to this port on the given server instead of the configured one
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a record, optionally with its reverse PTR record
    Add {
        #[command(flatten)]
        target: Target,
        /// Record name relative to the zone ("@" for the apex)
        #[arg(long)]
        name: String,
        /// Record type (A, AAAA, CNAME, MX, NS, PTR, SRV, TXT)
        #[arg(long = "type", value_parser = parse_record_type)]
        record_type: RecordType,
        /// Record data in presentation format
        #[arg(long)]
        data: String,
        #[arg(long, default_value_t = DEFAULT_DNS_RECORD_TTL_SECS)]
        ttl: u32,
        /// Also replace the PTR record for an A or AAAA record
        #[arg(long)]
        reverse: bool,
        /// Replace the RRset instead of adding to it
        #[arg(long)]
        replace: bool,
    },
    /// Point an alias at a target with a CNAME record
    Cname {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        alias: String,
        /// Target name (absolute)
        #[arg(long = "target")]
        cname_target: String,
        #[arg(long, default_value_t = DEFAULT_DNS_RECORD_TTL_SECS)]
        ttl: u32,
    },
    /// Delete every record at each name (given as owner.zone)
    Delete {
        #[arg(long)]
        server: String,
        #[arg(long)]
        key: String,
        #[arg(required = true)]
        records: Vec<String>,
    },
    /// Print the PTR owner and reverse zone for an address
    Reverse { address: String },
    /// Generate a new hmac-sha256 TSIG key
    Keygen { name: String },
}

#[derive(Args, Debug)]
struct Target {
    /// Nameserver hostname
    #[arg(long)]
    server: String,
    /// Zone the record belongs to
    #[arg(long)]
    zone: String,
    /// Name of the TSIG key to sign with
    #[arg(long)]
    key: String,
}

fn parse_record_type(value: &str) -> Result<RecordType, String> {
    RecordType::from_str(&value.to_ascii_uppercase())
        .map_err(|e| format!("unknown record type '{value}': {e}"))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    initialize_logging();
    debug!("Parsed command line: {:?}", cli.command);

    let output = cli.global.output;
    match cli.command {
        Command::Reverse { address } => {
            let reverse = reverse_name(&address)?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reverse)?),
                OutputFormat::Text => println!("{} {}", reverse.owner, reverse.zone),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Keygen { name } => {
            let credential = generate_tsig_key(&name);
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&credential)?),
                OutputFormat::Text => print!("{}", key_file_contents(&credential)),
            }
            Ok(ExitCode::SUCCESS)
        }
        command => run_update(&cli.global, command),
    }
}

/// Initialize logging on stderr so stdout carries only the report.
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT=json`.
fn initialize_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
    }
}

fn run_update(global: &GlobalOptions, command: Command) -> Result<ExitCode> {
    let config = Config::load(&global.config)?;
    let keys = config.keyring().context("Failed to load TSIG keys")?;
    let table = config.server_table();

    info!(
        "Using {} key(s) and {} configured server(s) from {}",
        keys.len(),
        table.len(),
        global.config.display()
    );
    let servers = server_registry(global.port, table);
    let orchestrator = UpdateOrchestrator::new(&keys, servers.as_ref(), config.transport());

    let result = match command {
        Command::Add {
            target,
            name,
            record_type,
            data,
            ttl,
            reverse,
            replace,
        } => orchestrator.add_record(
            &target.server,
            &target.zone,
            &name,
            record_type,
            &data,
            ttl,
            &target.key,
            reverse,
            replace,
        ),
        Command::Cname {
            target,
            alias,
            cname_target,
            ttl,
        } => orchestrator.add_cname_record(
            &target.server,
            &target.zone,
            &alias,
            &cname_target,
            ttl,
            &target.key,
        ),
        Command::Delete {
            server,
            key,
            records,
        } => orchestrator.delete_record(&server, &records, &key),
        Command::Reverse { .. } | Command::Keygen { .. } => {
            anyhow::bail!("command does not send an update")
        }
    };

    match result {
        Ok(report) => {
            print_report(&report, global.output)?;
            Ok(if report.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(e) => {
            error!("Update failed: {}", e);
            if global.output == OutputFormat::Json {
                let detail = binder::report::ErrorDetail::from(&e);
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                println!("FAILED: {e}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `--port` sends to any named server on that port; otherwise only
/// configured servers are known.
fn server_registry(port: Option<u16>, table: ServerTable) -> Box<dyn ServerRegistry> {
    match port {
        Some(port) => Box::new(FixedPort(port)),
        None => Box::new(table),
    }
}

fn print_report(report: &TransactionReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            for step in report {
                let status = if step.success { "OK" } else { "FAILED" };
                println!("{status}: {}", step.description);
                if let Some(response) = step.response() {
                    println!("  {response}");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod main_tests;
