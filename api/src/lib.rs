//! HTTP surface of the analyzer.
//!
//! `GET /api/health` and `POST /api/analyze`, with permissive CORS and
//! graceful shutdown on Ctrl+C.

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::cors::cors,
    routes::{analyze::analyze_route::analyze, health_route::health},
};

/// Loads state from the environment, binds and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let state = AppState::from_env()?;
    let address = state.address.clone();

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "api::start: listening");

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("api::start: stopped");
    Ok(())
}

/// All routes with CORS applied; state is shared by every handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("shutdown_signal: failed to listen for Ctrl+C: {err}");
        std::future::pending::<()>().await;
    }
}
