use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopkeeper::config::Config;
use shopkeeper::AppState;

#[derive(Parser, Debug)]
#[command(name = "shopkeeper")]
#[command(author, version, about = "A small storefront administration backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "shopkeeper.toml")]
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

    tracing::info!("Starting Shopkeeper v{}", env!("CARGO_PKG_VERSION"));

    // Create app state and run the bootstrap seeding
    let state = Arc::new(AppState::new(config.clone()));
    shopkeeper::startup::bootstrap(&state.config, &state.store).await?;

    // Create API router
    let api_router = shopkeeper::api::create_router(state.clone());

    // Serve uploaded images and the static storefront/admin UI
    let serve_uploads = ServeDir::new(&config.storage.upload_dir);
    let serve_public = ServeDir::new(&config.storage.public_dir);

    let app = axum::Router::new()
        .merge(api_router)
        .nest_service("/uploads", serve_uploads)
        .fallback_service(serve_public);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Admin panel: http://{}/admin.html", addr);

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
