//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use corpus_model::{DEFAULT_NATURALNESS_TOP_K, DEFAULT_SIMILAR_TOP_K};

use crate::errors::AnalyzerError;

/// Default location of the reference corpus, relative to the working directory.
pub const DEFAULT_CORPUS_PATH: &str = "data/corpus/python_outputs.txt";
/// Naturalness scores below this produce a `dataset_mismatch` issue.
pub const DEFAULT_MISMATCH_THRESHOLD: f64 = 0.3;

/// Analyzer knobs. All fields have defaults via [`AnalyzerConfig::default`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerConfig {
    pub corpus_path: PathBuf,
    pub naturalness_top_k: usize,
    pub similar_top_k: usize,
    pub mismatch_threshold: f64,
    /// Build the model at construction time instead of on first use.
    pub eager_build: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            naturalness_top_k: DEFAULT_NATURALNESS_TOP_K,
            similar_top_k: DEFAULT_SIMILAR_TOP_K,
            mismatch_threshold: DEFAULT_MISMATCH_THRESHOLD,
            eager_build: false,
        }
    }
}

impl AnalyzerConfig {
    /// Build from environment variables; unparsable values fall back to the
    /// defaults.
    ///
    /// Reads `BICS_CORPUS_PATH`, `NATURALNESS_TOP_K`, `SIMILAR_TOP_K`,
    /// `MISMATCH_THRESHOLD` and `MODEL_EAGER_BUILD`.
    pub fn from_env() -> Self {
        let dflt = Self::default();
        Self {
            corpus_path: PathBuf::from(env("BICS_CORPUS_PATH", DEFAULT_CORPUS_PATH)),
            naturalness_top_k: parse("NATURALNESS_TOP_K", dflt.naturalness_top_k),
            similar_top_k: parse("SIMILAR_TOP_K", dflt.similar_top_k),
            mismatch_threshold: parse("MISMATCH_THRESHOLD", dflt.mismatch_threshold),
            eager_build: env("MODEL_EAGER_BUILD", "false") == "true",
        }
    }

    pub fn with_corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.naturalness_top_k == 0 {
            return Err(AnalyzerError::Config("NATURALNESS_TOP_K must be >= 1".into()));
        }
        if self.similar_top_k == 0 {
            return Err(AnalyzerError::Config("SIMILAR_TOP_K must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.mismatch_threshold) {
            return Err(AnalyzerError::Config(format!(
                "MISMATCH_THRESHOLD must be within [0, 1], got {}",
                self.mismatch_threshold
            )));
        }
        Ok(())
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
