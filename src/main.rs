// src/main.rs

//! The main entry point for the Tunecast server application.

use anyhow::Result;
use std::env;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::EnvFilter, prelude::*};
use tunecast::config::Config;
use tunecast::logging;
use tunecast::server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    run_app().await
}

async fn run_app() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("Tunecast version {VERSION}");
        return Ok(());
    }

    // The configuration path can be given with --config; it defaults to "config.toml".
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("config.toml");

    // A missing file means defaults. A file that exists but does not parse or
    // validate is fatal.
    let config_missing = !Path::new(config_path).exists();
    let mut config = if config_missing {
        Config::default()
    } else {
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{config_path}\": {e:#}");
                std::process::exit(1);
            }
        }
    };

    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        if let Some(port_str) = args.get(port_index + 1) {
            match port_str.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => {
                    eprintln!("Invalid port number: {port_str}");
                    std::process::exit(1);
                }
            }
        } else {
            eprintln!("--port flag requires a value");
            std::process::exit(1);
        }
    }

    let mut operator_log_error = None;
    let operator_log = match config.storage.log_path() {
        Some(path) => match logging::open_operator_log(&path) {
            Ok(file) => Some(logging::operator_log_layer(file)),
            Err(e) => {
                operator_log_error = Some(format!("{}: {e}", path.display()));
                None
            }
        },
        None => None,
    };

    // RUST_LOG wins over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true),
        )
        .with(operator_log)
        .init();

    if let Some(e) = operator_log_error {
        warn!("Could not open the operator log at {e}; logging to the console only.");
    }
    if config_missing {
        warn!("No configuration file at \"{config_path}\"; using defaults.");
    }
    info!("Starting Tunecast {VERSION} on {}:{}", config.host, config.port);

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
