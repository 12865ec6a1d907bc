//! Pricing Console server
//!
//! ```sh
//! # Run with default config (~/.config/pricing-console/config.toml)
//! pricing-console
//!
//! # Custom config path
//! pricing-console --config /etc/pricing-console/config.toml
//!
//! # Override the listen port
//! pricing-console --port 9100
//!
//! # Validate config without starting
//! pricing-console --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use pricing_console::config::AppConfig;
use pricing_console::default_config_path;
use pricing_console::server::{init_tracing, ServerHandle};

/// REST API for editing usage-based pricing components.
#[derive(Parser, Debug)]
#[command(
    name = "pricing-console",
    version,
    about = "Usage-based pricing component editor service",
    long_about = "Pricing Console: metric catalog, tier ladder validation and \
                  usage component editing sessions over a REST API.\n\n\
                  Default config: ~/.config/pricing-console/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PRICING_CONSOLE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    // The level override must be applied before the subscriber is installed.
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file      : {}", config_path.display());
        println!("   API address      : {}", config.server.address());
        println!("   Log level        : {}", config.logging.level);
        println!("   Range convention : {}", config.tiers.range_convention);
        match &config.catalog.metrics_file {
            Some(path) => println!("   Metric catalog   : {}", path.display()),
            None => println!("   Metric catalog   : (in-memory, empty)"),
        }
        println!(
            "   Session TTL      : {}s (swept every {}s)",
            config.editor.session_ttl_secs, config.editor.sweep_interval_secs
        );
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();

    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
