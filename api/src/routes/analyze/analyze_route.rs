//! POST /api/analyze: naturalness score, similar examples and syntax issues.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use code_analyzer::AnalysisEnvelope;
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::analyze::analyze_request::AnalyzeRequest,
};

pub const MISSING_CODE: &str = "Missing 'code' in request body";

/// Handler: POST /api/analyze
///
/// The analysis itself is CPU-bound and runs on the blocking pool.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:6060/api/analyze \
///   -H 'content-type: application/json' \
///   -d '{"code":"def f(x)\n    return x"}'
/// ```
#[instrument(name = "analyze_route", skip_all)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<Json<AnalysisEnvelope>> {
    let Json(body) = payload?;
    let apply_fix = body.apply_fix();
    let code = body
        .code
        .ok_or_else(|| AppError::BadRequest(MISSING_CODE.to_string()))?;
    debug!(chars = code.chars().count(), apply_fix, "analyze request");

    let analyzer = Arc::clone(&state.analyzer);
    let envelope = tokio::task::spawn_blocking(move || analyzer.process(&code, apply_fix)).await??;

    Ok(Json(envelope))
}
