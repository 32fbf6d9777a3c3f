//! Statistics Panel
//!
//! Serves the admin statistics dashboard on top of the reports API.

use anyhow::Result;
use clap::Parser;
use statpanel::config::PanelConfig;
use statpanel::gateway::{Gateway, LogNavigator};
use statpanel::server;
use statpanel::session::SessionStore;
use statpanel::stats::StatsClient;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Statistics panel for the reports API
#[derive(Parser, Debug)]
#[command(name = "statpanel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Statistics panel v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = PanelConfig::load(&args.config).await?;
    info!("Loaded configuration from {}", args.config);

    // Session and gateway
    let store = Arc::new(SessionStore::open(&config.session.path).await?);
    if store.token().await.is_none() {
        info!("No session credential on file; the API will reject requests until login");
    }

    let gateway = Gateway::new(
        &config.api,
        config.server.entry_path.clone(),
        store,
        Arc::new(LogNavigator),
    )?;
    let stats = StatsClient::new(gateway);

    server::start_server(config, stats).await
}
