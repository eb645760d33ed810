use std::sync::Arc;

use code_analyzer::{AnalyzerConfig, CodeAnalyzer};
use tracing::info;

use crate::error_handler::AppError;

const DEFAULT_PORT: u16 = 6060;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Listen address, e.g. "0.0.0.0:6060".
    pub address: String,
    /// Built once at startup and shared by every request.
    pub analyzer: Arc<CodeAnalyzer>,
}

impl AppState {
    pub fn new(address: impl Into<String>, analyzer: CodeAnalyzer) -> Self {
        Self {
            address: address.into(),
            analyzer: Arc::new(analyzer),
        }
    }

    /// Load shared state from environment variables.
    ///
    /// `API_ADDRESS` wins; otherwise binds `0.0.0.0:$PORT` (default 6060).
    /// The analyzer reads its own variables, see [`AnalyzerConfig::from_env`].
    pub fn from_env() -> Result<Self, AppError> {
        let address = std::env::var("API_ADDRESS").unwrap_or_else(|_| {
            let port = std::env::var("PORT")
                .ok()
                .and_then(|p| p.trim().parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);
            format!("0.0.0.0:{port}")
        });

        let cfg = AnalyzerConfig::from_env();
        info!(
            corpus = %cfg.corpus_path.display(),
            eager_build = cfg.eager_build,
            "AppState::from_env: creating analyzer"
        );
        let analyzer = CodeAnalyzer::new(cfg).map_err(AppError::Init)?;

        Ok(Self::new(address, analyzer))
    }
}
