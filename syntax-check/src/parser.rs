//! The parser seam: source in, parsed source or first diagnostic out.

use tree_sitter::Tree;

use crate::{
    diagnostic::Diagnostic,
    errors::SyntaxCheckError,
    grammar::Grammar,
    lexer::{Token, TokenKind, tokenize},
    structure,
};

/// Anything able to decide whether a piece of source is valid.
///
/// Implementations must be pure: the same input always yields the same
/// result, and parsing never executes the code.
pub trait SyntaxParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<ParsedSource, Diagnostic>;
}

/// Successfully parsed source.
#[derive(Debug)]
pub struct ParsedSource {
    tokens: Vec<Token>,
    tree: Option<Tree>,
}

impl ParsedSource {
    pub fn new(tokens: Vec<Token>, tree: Option<Tree>) -> Self {
        Self { tokens, tree }
    }

    /// Concrete syntax tree, absent when the grammar pass produced none.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn logical_line_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Newline)
            .count()
    }
}

/// Python parser producing CPython-worded diagnostics.
///
/// Runs three passes and stops at the first failure:
/// 1. tokenizer (strings, brackets, indentation, literals),
/// 2. block structure (header colons, indented blocks),
/// 3. the tree-sitter grammar, plus the Python 2 forms it still accepts.
///
/// Structural errors located before a tokenizer failure win, matching the
/// order in which CPython reports them.
#[derive(Clone)]
pub struct PythonParser {
    grammar: Grammar,
}

impl PythonParser {
    pub fn new() -> Result<Self, SyntaxCheckError> {
        Ok(Self {
            grammar: Grammar::python()?,
        })
    }
}

impl SyntaxParser for PythonParser {
    fn parse(&self, source: &str) -> Result<ParsedSource, Diagnostic> {
        let lexed = tokenize(source);
        structure::check(&lexed.tokens, lexed.is_complete())?;
        if let Some(err) = lexed.error {
            return Err(err);
        }
        let tree = self.grammar.parse(source)?;
        Ok(ParsedSource::new(lexed.tokens, tree))
    }
}
