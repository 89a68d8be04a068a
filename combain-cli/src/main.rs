//! Combain CLI - Command-line interface
//!
//! Submits WiFi and cell-tower observations given on the command line to the
//! Combain positioning service and prints the resulting location.

mod error;
mod outcome;
mod runner;
mod scan_args;

use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use combain::config::ConfigFile;
use combain::logging::{init_logging, DEFAULT_FILTER};
use combain::scan::{CellTower, ScanItem, WifiAccessPoint};
use combain::service::LocationService;
use tracing::info;

use error::CliError;
use scan_args::{parse_cell, parse_wifi};

#[derive(Parser)]
#[command(name = "combain-locate")]
#[command(version)]
#[command(about = "Locate this device using the Combain positioning service", long_about = None)]
struct Args {
    /// Visible WiFi access point as MAC,SSID,RSSI (repeatable)
    #[arg(short, long = "wifi", value_name = "MAC,SSID,RSSI", value_parser = parse_wifi)]
    wifi: Vec<WifiAccessPoint>,

    /// Serving cell as TECH,MCC,MNC,LAC,CELLID,RSSI (repeatable)
    #[arg(
        short,
        long = "cell",
        value_name = "TECH,MCC,MNC,LAC,CELLID,RSSI",
        value_parser = parse_cell
    )]
    cell: Vec<CellTower>,

    /// API key (overrides config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Service endpoint base URL (overrides config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// HTTP timeout in seconds (overrides config file)
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file path (default: ~/.combain/config.ini)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seconds to wait for a result
    #[arg(long, default_value = "60")]
    deadline: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => e.exit(),
    }
}

fn run(args: Args) -> Result<i32, CliError> {
    let filter = if args.verbose { "debug" } else { DEFAULT_FILTER };
    let _logging_guard =
        init_logging(filter, args.log_file.as_deref()).map_err(CliError::LoggingInit)?;

    let items: Vec<ScanItem> = args
        .wifi
        .into_iter()
        .map(ScanItem::from)
        .chain(args.cell.into_iter().map(ScanItem::from))
        .collect();
    if items.is_empty() {
        return Err(CliError::NoScanItems);
    }

    let file = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    let mut config = file.to_service_config();
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = Duration::from_secs(timeout);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let mut service = LocationService::start_default(&config)?;
    info!(items = items.len(), "Locating");

    let result = runtime.block_on(runner::locate(
        &mut service,
        items,
        Duration::from_secs(args.deadline),
    ));
    service.shutdown();

    let outcome = result?;
    // Nothing sensible to do if stdout/stderr are gone
    let _ = outcome.report(&mut io::stdout(), &mut io::stderr());
    Ok(outcome.exit_code())
}
