//! LDN Inbox Server
//!
//! A Linked Data Notifications receiver.

use std::path::PathBuf;

use clap::Parser;
use ldn_inbox::{InboxConfig, InboxServer, StorageMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Linked Data Notifications inbox server
#[derive(Parser, Debug)]
#[command(name = "ldn-inbox")]
#[command(version)]
#[command(about = "Receive and serve Linked Data Notifications", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Public base URL the inbox IRI is derived from
    #[arg(long)]
    base_url: Option<String>,

    /// Path the inbox is mounted at
    #[arg(long)]
    inbox_path: Option<String>,

    /// Storage backend: `mem` or `registry`
    #[arg(long)]
    storage: Option<StorageMode>,

    /// Bind to all interfaces (0.0.0.0)
    #[arg(long)]
    public: bool,

    /// Answer malformed notifications with 500 like older receivers
    #[arg(long)]
    legacy_status_codes: bool,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn apply(self, config: &mut InboxConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if self.public {
            config.host = "0.0.0.0".to_string();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(path) = self.inbox_path {
            config.inbox_path = ldn_inbox::config::normalize_path(&path);
        }
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        if self.legacy_status_codes {
            config.legacy_status_codes = true;
        }
        if self.no_cors {
            config.cors_enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = match args.verbose {
        0 => "ldn_inbox=info,tower_http=debug",
        1 => "ldn_inbox=debug,ldn_graph=debug,tower_http=debug",
        _ => "ldn_inbox=trace,ldn_graph=trace,tower_http=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => InboxConfig::from_file(path)?,
        None => InboxConfig::default(),
    };
    config.apply_env()?;
    args.apply(&mut config);
    config.validate()?;
    config.log_summary();

    let server = InboxServer::new(config)?;

    // Set up graceful shutdown
    let shutdown_signal = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C handler: {}", err);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    server.run_with_shutdown(shutdown_signal).await?;

    Ok(())
}
