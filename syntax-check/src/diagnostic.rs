use std::fmt;

use serde::Serialize;

/// Error class of a diagnostic, following Python's exception hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    SyntaxError,
    IndentationError,
    TabError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::SyntaxError => "SyntaxError",
            DiagnosticKind::IndentationError => "IndentationError",
            DiagnosticKind::TabError => "TabError",
        };
        f.write_str(name)
    }
}

/// A parser rejection: message plus 1-based location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// 1-based line, if known.
    pub line: Option<usize>,
    /// 1-based character column, if known.
    pub col: Option<usize>,
}

impl Diagnostic {
    pub fn syntax(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self::at(DiagnosticKind::SyntaxError, message, line, col)
    }

    pub fn indentation(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self::at(DiagnosticKind::IndentationError, message, line, col)
    }

    pub fn tab(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self::at(DiagnosticKind::TabError, message, line, col)
    }

    fn at(kind: DiagnosticKind, message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        match (self.line, self.col) {
            (Some(line), Some(col)) => write!(f, " (line {line}, col {col})"),
            (Some(line), None) => write!(f, " (line {line})"),
            _ => Ok(()),
        }
    }
}
