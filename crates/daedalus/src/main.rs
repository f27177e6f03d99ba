//! Daedalus - Entry point
//!
//! This is the main binary for the Daedalus diagram service.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info};

use daedalus_server::{Server, ServerConfig};
use daedalus_telemetry::{init_logging, LogConfig};

/// Command-line arguments.
struct Args {
    /// Use development (human-readable) logging.
    dev: bool,
}

impl Args {
    fn parse() -> Self {
        let mut dev = false;

        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--dev" => dev = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("daedalus {}", daedalus::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { dev }
    }
}

fn print_help() {
    println!(
        r"Daedalus - Project ingestion and UML diagram service

USAGE:
    daedalus [OPTIONS]

OPTIONS:
        --dev              Human-readable logging instead of JSON
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    DAEDALUS_HTTP_ADDR           Bind address (default: 0.0.0.0:8080)
    DAEDALUS_WORKSPACE_DIR       Extraction workspace directory
    DAEDALUS_MAX_UPLOAD_BYTES    Maximum upload body size in bytes
    DAEDALUS_SHUTDOWN_TIMEOUT    Graceful shutdown timeout in seconds
    DAEDALUS_REQUEST_TIMEOUT     Per-request timeout in seconds
    RUST_LOG                     Log filter override (e.g. daedalus=debug)

EXAMPLES:
    # Run on the default port with JSON logs
    daedalus

    # Run locally with readable logs on another port
    DAEDALUS_HTTP_ADDR=127.0.0.1:3000 daedalus --dev
"
    );
}

/// Builds the server configuration from environment variables.
fn config_from_env() -> ServerConfig {
    let mut builder = ServerConfig::builder();

    if let Ok(addr) = std::env::var("DAEDALUS_HTTP_ADDR") {
        builder = builder.http_addr(addr);
    }
    if let Ok(dir) = std::env::var("DAEDALUS_WORKSPACE_DIR") {
        builder = builder.workspace_dir(PathBuf::from(dir));
    }
    if let Some(max) = env_number("DAEDALUS_MAX_UPLOAD_BYTES") {
        builder = builder.max_upload_bytes(usize::try_from(max).unwrap_or(usize::MAX));
    }
    if let Some(secs) = env_number("DAEDALUS_SHUTDOWN_TIMEOUT") {
        builder = builder.shutdown_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = env_number("DAEDALUS_REQUEST_TIMEOUT") {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }

    builder.build()
}

fn env_number(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("Ignoring {name}: '{raw}' is not a number");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_config = if args.dev {
        LogConfig::development()
    } else {
        LogConfig::production()
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let config = config_from_env();
    if let Err(e) = config.socket_addr() {
        error!("Invalid bind address '{}': {}", config.http_addr(), e);
        std::process::exit(1);
    }

    info!("Starting Daedalus v{}", daedalus::VERSION);
    info!("Listening on {}", config.http_addr());
    info!("Workspace: {}", config.workspace_dir().display());

    if let Err(e) = Server::new(config).run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
