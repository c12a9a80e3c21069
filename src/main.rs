use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use energy_portal_client::{
    cli::{execute_command, Cli},
    config::Config,
    portal::Portal,
    storage::SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.portal.base_url,
        "Energy portal client starting"
    );

    // Open session store
    let store = match SqliteStore::new(&config.storage).await {
        Ok(s) => {
            debug!(path = %config.storage.path.display(), "Session store opened");
            s
        }
        Err(e) => {
            error!(error = %e, "Failed to open session store");
            return Err(e.into());
        }
    };

    let portal = match Portal::new(&config, Arc::new(store)).await {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Failed to initialize portal client");
            return Err(e.into());
        }
    };

    let result = execute_command(cli.command, &portal).await;

    // Deliver queued behavior events before exiting
    portal.shutdown().await;

    if result.exit_code == 0 {
        println!("{}", result.message);
    } else {
        eprintln!("{}", result.message);
    }
    std::process::exit(result.exit_code)
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        energy_portal_client::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        energy_portal_client::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
