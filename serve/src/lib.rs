//! HTTP server for the campaign generator (axum).
//!
//! Serves the brief form at `GET /`, handles form submissions at
//! `POST /generate`, and exposes the chain as a JSON API at
//! `POST /api/generate`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`].

mod app;
mod pages;

pub use app::AppState;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use app::router;

/// Listen address used when the caller does not pass one.
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8501";

/// Runs the server on an existing listener with the given state. Used by
/// tests (bind to 127.0.0.1:0, inject a scripted model, then pass both here).
pub async fn run_serve_on_listener(
    listener: TcpListener,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("campaign server listening on http://{}", addr);
    let app = router(Arc::new(state));
    axum::serve(listener, app).await?;
    Ok(())
}

/// Binds `addr` (default 127.0.0.1:8501) and serves until interrupted.
/// The Gemini client and prompts are built from the environment, so a
/// missing API key fails here rather than on the first request.
pub async fn run_serve(addr: Option<&str>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.unwrap_or(DEFAULT_HTTP_ADDR);
    let state = AppState::from_env()?;
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, state).await
}
