// Declaro — Application Entry Point
//
// Parses CLI arguments, loads configuration, initializes structured logging
// and dispatches to the command handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use declaro::cli::{execute, Cli};
use declaro::config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured filter. Secrets are never logged at any level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .init();

    if let Err(e) = execute(cli.command, &config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
