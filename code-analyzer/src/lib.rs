//! Code analysis orchestration.
//!
//! [`CodeAnalyzer`] scores a snippet against the reference corpus, retrieves
//! the closest corpus examples, runs the Python syntax classifier, and folds
//! everything into an [`AnalysisReport`]. Corpus and configuration failures
//! are returned as [`AnalyzerError`]; every other input yields a report.

mod analyzer;
pub mod config;
mod errors;
mod report;

pub use analyzer::CodeAnalyzer;
pub use config::AnalyzerConfig;
pub use errors::{AnalyzerError, AnalyzerResult};
pub use report::{AnalysisEnvelope, AnalysisReport, DATASET_MISMATCH_MESSAGE, dataset_mismatch_issue};

pub use corpus_model::SimilarExample;
pub use syntax_check::{Issue, IssueType};
