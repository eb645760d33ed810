//! Unified error type for corpus loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the corpus that backs the model.
///
/// All variants are configuration problems: the model is never built from a
/// partial corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus file does not exist.
    #[error(
        "corpus not found at '{}'; run the corpus preparation step before using the model",
        path.display()
    )]
    NotFound { path: PathBuf },

    /// The corpus file parsed into zero snippets.
    #[error(
        "no snippets loaded from corpus at '{}'; check that the corpus preparation step ran correctly",
        path.display()
    )]
    Empty { path: PathBuf },

    /// The corpus file exists but could not be read as UTF-8 text.
    #[error("failed to read corpus at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
