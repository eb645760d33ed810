//! Typed error for the syntax-check crate.

use thiserror::Error;

/// Setup failures. Checking code never fails; invalid code is reported as a
/// [`crate::Diagnostic`].
#[derive(Debug, Error)]
pub enum SyntaxCheckError {
    /// The bundled Python grammar is incompatible with the tree-sitter runtime.
    #[error("failed to load the python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}
