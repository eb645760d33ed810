use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of finding categories reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// The code looks unlike the reference corpus.
    DatasetMismatch,
    MissingColon,
    MissingParenthesis,
    MissingQuotation,
    /// Any other parser rejection.
    SyntaxError,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::DatasetMismatch => "dataset_mismatch",
            IssueType::MissingColon => "missing_colon",
            IssueType::MissingParenthesis => "missing_parenthesis",
            IssueType::MissingQuotation => "missing_quotation",
            IssueType::SyntaxError => "syntax_error",
        }
    }

    /// True for every category produced by the syntax classifier.
    pub fn is_syntax(&self) -> bool {
        !matches!(self, IssueType::DatasetMismatch)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured finding of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_type: IssueType,
    /// 1-based line, `null` when the finding has no location.
    pub line: Option<usize>,
    /// 1-based column, `null` when the finding has no location.
    pub col: Option<usize>,
    pub message: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub suggested_fix: Option<String>,
}
