// File search service: HTTP/JSON front end over an embedded Tantivy index.
//
// Configuration comes from `SS_*` environment variables; log filtering from
// `RUST_LOG` (default `info`).

use std::sync::Arc;

use anyhow::{Context, Result};
use file_search_service::server::{self, AppState};
use file_search_service::{
    HealthCheckWorker, HealthReporter, SearchController, SearchService, ServiceConfig,
    TantivyStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServiceConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port(),
        data_dir = ?config.data_dir(),
        index = %config.index_name(),
        "Starting file search service"
    );

    // The service must not accept requests without a verified index
    let store = TantivyStore::initialize(config.store_options(), config.index_name())
        .with_context(|| format!("Failed to initialize index '{}'", config.index_name()))?;

    let controller = Arc::new(SearchController::new(store));
    let service =
        SearchService::new(controller).with_health_check_timeout(config.health_check_timeout());

    let reporter = Arc::new(HealthReporter::new());
    let health_loop = HealthCheckWorker::new(service.clone(), reporter.clone())
        .with_interval(config.health_check_interval())
        .spawn();

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.socket_addr()))?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Received shutdown signal");
    };

    let result = server::serve(listener, AppState::new(service, reporter), shutdown).await;

    health_loop.abort();
    result.context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
