//! HTTP transport for the search service

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorBody};
pub use routes::{
    AppState, CREATE_FILE_PATH, DELETE_PATH, HEALTH_PATH, SEARCH_PATH, UPDATE_PATH, router,
};

use tokio::net::TcpListener;

/// Serve `state` on `listener` until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
