use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gradxp::config::Config;
use gradxp::AppState;

#[derive(Parser, Debug)]
#[command(name = "gradxp")]
#[command(author, version, about = "Self-hosted e-learning platform backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "gradxp.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GradXP v{}", env!("CARGO_PKG_VERSION"));

    // Create app state (opens the data directory and loads persisted state)
    let state = Arc::new(AppState::new(config.clone())?);

    // Ensure default admin user exists
    state
        .users
        .ensure_admin_user(&config.auth.admin_email, &config.auth.admin_password)?;

    // Reconnect the wallet if the last run left it connected
    if state.wallet.was_connected() {
        match state.wallet.connect().await {
            Ok(snapshot) => {
                tracing::info!(address = ?snapshot.address, "Wallet reconnected");
            }
            Err(e) => tracing::warn!(error = %e, "Wallet auto-reconnect failed"),
        }
    }

    // Create API router
    let app = gradxp::api::create_router(state.clone());

    // Start API server
    let api_addr = format!("{}:{}", config.server.host, config.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;

    tracing::info!("API server listening on http://{}", api_addr);
    tracing::info!("Admin token: {}", config.auth.admin_token);
    tracing::info!("Catalog ready with {} courses", state.catalog.len());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
