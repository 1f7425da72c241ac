//! Libris Server - Library Management System
//!
//! A Rust REST API server for a library catalog and its borrow records.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{
    api::{self, routes::RouteTable},
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    tracing::info!(
        "Starting Libris Server v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let repository = Repository::connect(&config.database).await?;
    repository.ping().await?;
    tracing::info!("Pinged document store");

    audit_routes(&config);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState::new(config, repository.clone());
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    repository.close().await;
    tracing::info!("Document store closed");

    served?;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libris_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Log the effective guard of every route and flag writes left open
fn audit_routes(config: &AppConfig) {
    let table = RouteTable::with_overrides(&config.access.overrides);
    for route in table.routes() {
        tracing::debug!(route = %route.endpoint, guard = ?route.guard, "route registered");
    }
    for endpoint in table.unguarded_writes() {
        tracing::warn!(
            route = %endpoint,
            "mutating route has no authentication; set access.overrides to guard it"
        );
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
