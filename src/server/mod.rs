//! HTTP surface for the evaluator.
//!
//! Routes:
//!
//! - `GET /` - calculator page
//! - `POST /calculate` - evaluate `{"expression": "..."}`
//!
//! Every request passes through a tower-http trace layer. Bodies over the
//! limit are refused by the `Json` extractor, so the handler still answers
//! `413` in the endpoint's JSON shape.

pub mod assets;
pub mod dto;
pub mod handlers;

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::expr::Evaluator;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    /// Evaluator used for every request.
    pub evaluator: Evaluator,
}

/// Builds the application router.
#[must_use]
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/calculate", post(handlers::calculate))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

/// Binds to `config.addr` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is unavailable, or
/// [`ServerError::Serve`] if the server loop fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState {
        evaluator: Evaluator::with_limits(config.limits),
    };
    let app = router(state, config.body_limit);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: config.addr.to_string(),
            reason: e.to_string(),
        })?;
    tracing::info!("HTTP server listening on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }
}
