pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with the action handlers and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/create_project", post(routes::projects::create_project))
        .route("/start_project", post(routes::projects::start_project))
        .route("/stop_project", post(routes::projects::stop_project))
        .route("/delete_project", post(routes::projects::delete_project))
        .route("/healthz", get(routes::health::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the action handlers until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Like [`serve`], on a listener the caller already bound.
pub async fn serve_on(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    tracing::info!("launchpad listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
