//! Report types returned to callers.

use corpus_model::SimilarExample;
use serde::{Deserialize, Serialize};
use syntax_check::{Issue, IssueType};

/// Message of the issue raised when code looks unlike the corpus.
pub const DATASET_MISMATCH_MESSAGE: &str =
    "The code looks unusual compared to the reference corpus and may contain mistakes.";

/// Full result of analyzing one snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// `model_score >= threshold` and the code parses.
    pub ok: bool,
    /// Dataset mismatch first (if any), then the syntax issue (if any).
    pub issues: Vec<Issue>,
    /// Naturalness in `[0, 1]`.
    pub model_score: f64,
    pub similar_examples: Vec<SimilarExample>,
}

impl AnalysisReport {
    pub fn has_syntax_issue(&self) -> bool {
        self.issues.iter().any(|i| i.issue_type.is_syntax())
    }
}

/// Wire shape of `process`: the report plus the always-empty fix slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    pub analysis: AnalysisReport,
    pub fixed_code: Option<String>,
}

/// Location-less issue whose confidence grows as the score drops.
pub fn dataset_mismatch_issue(model_score: f64) -> Issue {
    Issue {
        issue_type: IssueType::DatasetMismatch,
        line: None,
        col: None,
        message: DATASET_MISMATCH_MESSAGE.to_string(),
        confidence: (1.0 - model_score).clamp(0.0, 1.0),
        suggested_fix: None,
    }
}
