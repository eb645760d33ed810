//! Error type of the analysis pipeline.

use corpus_model::CorpusError;
use syntax_check::SyntaxCheckError;
use thiserror::Error;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Hard failures. Invalid code is never an error; it is reported as an issue.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The reference corpus could not be loaded.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// The syntax checker could not be initialized.
    #[error(transparent)]
    Syntax(#[from] SyntaxCheckError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
