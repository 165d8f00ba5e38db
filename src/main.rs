//! Scheduler service binary.
//!
//! Drives the periodic control loop against a JSON-file datastore. Logging
//! goes to stderr; the per-round summary prints to stdout. SIGINT/SIGTERM
//! finish the current round before exiting.

use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::{value_parser, Arg, Command};
use tracing_subscriber::EnvFilter;

use fab_dispatch::config::EngineConfig;
use fab_dispatch::gateway::JsonFileGateway;
use fab_dispatch::service::SchedulerService;

const DEFAULT_INTERVAL_SECONDS: u64 = 300;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("fab-dispatch")
        .about("Periodic lot-to-machine dispatch scheduling for a test floor")
        .arg(
            Arg::new("interval")
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .help("Seconds between scheduling rounds (default 300)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Engine configuration JSON (defaults apply when omitted)"),
        )
        .arg(
            Arg::new("problem")
                .long("problem")
                .value_name("FILE")
                .default_value("problem.json")
                .help("Problem snapshot document (machines, lots, process_times)"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .value_name("FILE")
                .default_value("dispatch.jsonl")
                .help("Dispatch record output file (JSON lines)"),
        )
        .get_matches();

    let interval = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or(DEFAULT_INTERVAL_SECONDS);

    let config = match matches.get_one::<String>("config") {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("cannot load engine config: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let gateway = JsonFileGateway::new(
        matches
            .get_one::<String>("problem")
            .map(String::as_str)
            .unwrap_or("problem.json"),
        matches
            .get_one::<String>("out")
            .map(String::as_str)
            .unwrap_or("dispatch.jsonl"),
    );
    if let Err(err) = gateway.probe() {
        eprintln!("datastore initialization failed: {err}");
        return ExitCode::FAILURE;
    }

    let service = match SchedulerService::new(gateway, config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = service.shutdown_flag();
    if let Err(err) = ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed)) {
        eprintln!("cannot install signal handler: {err}");
        return ExitCode::FAILURE;
    }

    service.run(Duration::from_secs(interval));
    ExitCode::SUCCESS
}
