//! Full-grammar pass backed by tree-sitter-python.

use tree_sitter::{Language, Node, Parser, Tree};
use tracing::{debug, warn};

use crate::{diagnostic::Diagnostic, errors::SyntaxCheckError};

/// Loaded Python grammar. A fresh [`Parser`] is created per call so a single
/// `Grammar` can be shared between threads.
#[derive(Clone)]
pub struct Grammar {
    language: Language,
}

impl Grammar {
    pub fn python() -> Result<Self, SyntaxCheckError> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        // Fail at construction time rather than on the first request.
        Parser::new().set_language(&language)?;
        Ok(Self { language })
    }

    /// Parses `source` and reports the first ERROR or MISSING node in
    /// document order. `Ok(None)` means tree-sitter gave up without a tree.
    pub fn parse(&self, source: &str) -> Result<Option<Tree>, Diagnostic> {
        let mut parser = Parser::new();
        if let Err(err) = parser.set_language(&self.language) {
            warn!("grammar::parse: language rejected: {err}");
            return Ok(None);
        }
        let Some(tree) = parser.parse(source, None) else {
            warn!("grammar::parse: tree-sitter returned no tree");
            return Ok(None);
        };

        if let Some(node) = first_problem(&tree) {
            let message = if node.is_missing() {
                format!("expected '{}'", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            let line = node.start_position().row + 1;
            let col = char_column(source, node);
            debug!(line, col, kind = node.kind(), "grammar::parse: rejected");
            return Err(Diagnostic::syntax(message, line, col));
        }
        if let Some((node, message)) = first_rejected(&tree) {
            let line = node.start_position().row + 1;
            let col = char_column(source, node);
            debug!(line, col, kind = node.kind(), "grammar::parse: not python 3");
            return Err(Diagnostic::syntax(message, line, col));
        }
        Ok(Some(tree))
    }
}

/// Pre-order walk that only descends into subtrees carrying an error.
fn first_problem(tree: &Tree) -> Option<Node<'_>> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Pre-order walk over a clean tree for constructs the grammar accepts but
/// CPython 3 rejects.
fn first_rejected(tree: &Tree) -> Option<(Node<'_>, String)> {
    let mut cursor = tree.root_node().walk();
    loop {
        let node = cursor.node();
        if let Some(found) = rejected(node) {
            return Some(found);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn rejected(node: Node<'_>) -> Option<(Node<'_>, String)> {
    match node.kind() {
        // Python 2 statements kept by tree-sitter-python
        "print_statement" => Some((node, missing_parentheses("print"))),
        "exec_statement" => Some((node, missing_parentheses("exec"))),
        "parameters" | "lambda_parameters" => non_default_after_default(node).map(|param| {
            (
                param,
                "parameter without a default follows parameter with a default".to_string(),
            )
        }),
        _ => None,
    }
}

fn missing_parentheses(name: &str) -> String {
    format!("Missing parentheses in call to '{name}'. Did you mean {name}(...)?")
}

/// First positional parameter lacking a default after one that has it.
/// Everything after `*`, `*args` or `**kwargs` is keyword-only and exempt.
fn non_default_after_default(params: Node<'_>) -> Option<Node<'_>> {
    let mut seen_default = false;
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "default_parameter" | "typed_default_parameter" => seen_default = true,
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => {
                return None;
            }
            "typed_parameter" => {
                let splat = param.named_child(0).is_some_and(|inner| {
                    matches!(inner.kind(), "list_splat_pattern" | "dictionary_splat_pattern")
                });
                if splat {
                    return None;
                }
                if seen_default {
                    return Some(param);
                }
            }
            "identifier" if seen_default => return Some(param),
            _ => {}
        }
    }
    None
}

/// 1-based column in characters; tree-sitter positions are in bytes.
fn char_column(source: &str, node: Node<'_>) -> usize {
    let start = node.start_byte();
    match source.get(..start) {
        Some(prefix) => {
            let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
            prefix[line_start..].chars().count() + 1
        }
        None => node.start_position().column + 1,
    }
}
