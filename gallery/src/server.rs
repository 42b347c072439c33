use std::sync::Arc;
use std::time::Duration;

use aide::openapi::OpenApi;
use axum::{extract::DefaultBodyLimit, Extension, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::notifications::ToastBoard;
use crate::routes;
use crate::{sync::GallerySync, types::Environment};

/// Largest request body accepted, enough for a camera photo
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the application router with all dependencies attached
pub fn router(
    environment: Environment,
    gallery: Arc<GallerySync>,
    toasts: Arc<ToastBoard>,
) -> Router {
    let mut openapi = OpenApi::default();

    routes::handler()
        .finish_api_with(&mut openapi, routes::describe_api)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(gallery))
        .layer(Extension(toasts))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    gallery: Arc<GallerySync>,
    toasts: Arc<ToastBoard>,
) -> anyhow::Result<()> {
    let router = router(environment, gallery, toasts);

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("📷 Photo gallery started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
