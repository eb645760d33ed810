//! Maps parser diagnostics onto user-facing issues.

use tracing::debug;

use crate::{
    diagnostic::Diagnostic,
    issue::{Issue, IssueType},
    parser::SyntaxParser,
};

/// Confidence attached to every syntax-derived issue.
pub const SYNTAX_CONFIDENCE: f64 = 0.95;

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    /// Case-insensitive substrings; any one of them selects the rule.
    pub needles: &'static [&'static str],
    pub issue_type: IssueType,
    pub message: &'static str,
    pub suggested_fix: &'static str,
}

/// Evaluated top to bottom, first match wins.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        needles: &["expected ':'"],
        issue_type: IssueType::MissingColon,
        message: "Missing ':' at the end of a block header (def, if, for, while, class, ...).",
        suggested_fix: "Add ':' at the end of the indicated line.",
    },
    ClassificationRule {
        needles: &["was never closed", "unexpected eof while parsing"],
        issue_type: IssueType::MissingParenthesis,
        message: "An opening bracket or parenthesis is never closed.",
        suggested_fix: "Check the parentheses, brackets and braces and add the missing closing one.",
    },
    ClassificationRule {
        needles: &["string literal", "unterminated"],
        issue_type: IssueType::MissingQuotation,
        message: "A string literal is not terminated.",
        suggested_fix: "Close the string with the matching quote on the indicated line.",
    },
];

/// Outcome of checking one snippet: at most one issue, since parsing stops
/// at the first error.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxVerdict {
    pub valid: bool,
    pub issue: Option<Issue>,
}

/// First rule whose needle occurs in `message`, ignoring case.
pub fn match_rule(message: &str) -> Option<&'static ClassificationRule> {
    let lowered = message.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| lowered.contains(needle)))
}

/// Builds the issue for a diagnostic; unmatched messages become a generic
/// `syntax_error` that carries the raw parser message and no fix.
pub fn issue_from_diagnostic(diagnostic: &Diagnostic) -> Issue {
    match match_rule(&diagnostic.message) {
        Some(rule) => Issue {
            issue_type: rule.issue_type,
            line: diagnostic.line,
            col: diagnostic.col,
            message: rule.message.to_string(),
            confidence: SYNTAX_CONFIDENCE,
            suggested_fix: Some(rule.suggested_fix.to_string()),
        },
        None => Issue {
            issue_type: IssueType::SyntaxError,
            line: diagnostic.line,
            col: diagnostic.col,
            message: diagnostic.message.clone(),
            confidence: SYNTAX_CONFIDENCE,
            suggested_fix: None,
        },
    }
}

/// Parses `code` and classifies the first diagnostic, if any.
pub fn classify(parser: &dyn SyntaxParser, code: &str) -> SyntaxVerdict {
    match parser.parse(code) {
        Ok(_) => SyntaxVerdict {
            valid: true,
            issue: None,
        },
        Err(diagnostic) => {
            let issue = issue_from_diagnostic(&diagnostic);
            debug!(
                issue_type = %issue.issue_type,
                line = ?diagnostic.line,
                "classify: {diagnostic}"
            );
            SyntaxVerdict {
                valid: false,
                issue: Some(issue),
            }
        }
    }
}
