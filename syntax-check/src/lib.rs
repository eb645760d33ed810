//! Python syntax checking and issue classification.
//!
//! [`PythonParser`] implements [`SyntaxParser`]: it either returns the parsed
//! source or a [`Diagnostic`] worded like CPython's own syntax errors
//! (`expected ':'`, `'(' was never closed`, ...). [`classify`] then maps the
//! diagnostic message onto an [`IssueType`] through an ordered table of
//! substring rules ([`CLASSIFICATION_RULES`]); anything unmatched falls back
//! to a generic `syntax_error` issue carrying the raw message.

mod classify;
mod diagnostic;
mod errors;
mod grammar;
mod issue;
pub mod lexer;
mod parser;
mod structure;

pub use classify::{
    CLASSIFICATION_RULES, ClassificationRule, SYNTAX_CONFIDENCE, SyntaxVerdict, classify,
    issue_from_diagnostic, match_rule,
};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use errors::SyntaxCheckError;
pub use issue::{Issue, IssueType};
pub use parser::{ParsedSource, PythonParser, SyntaxParser};
