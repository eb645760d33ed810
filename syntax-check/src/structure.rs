//! Block-structure checks over logical lines.
//!
//! Compound statement headers must end their header with a top-level `:`,
//! a header ending in `:` must be followed by an indented block, and a line
//! may only be indented when it opens such a block.

use crate::diagnostic::Diagnostic;
use crate::lexer::{Token, TokenKind};

/// One NEWLINE-terminated statement.
struct LogicalLine<'a> {
    tokens: &'a [Token],
    /// Preceded by an INDENT token.
    indented: bool,
}

/// A header whose body must follow as an indented block.
struct BlockHeader {
    construct: String,
    line: usize,
    colon_line: usize,
    colon_end_col: usize,
}

/// Checks the logical lines in `tokens`.
///
/// With `complete == false` the stream stops at a tokenizer error: only the
/// finished lines are checked and the end-of-input rules are skipped.
pub fn check(tokens: &[Token], complete: bool) -> Result<(), Diagnostic> {
    let mut pending: Option<BlockHeader> = None;

    for line in logical_lines(tokens) {
        let Some(first) = line.tokens.first() else {
            continue;
        };
        match (pending.take(), line.indented) {
            (Some(header), false) => {
                return Err(Diagnostic::indentation(
                    format!(
                        "expected an indented block after {} on line {}",
                        header.construct, header.line
                    ),
                    first.line,
                    first.col + 1,
                ));
            }
            (None, true) => {
                return Err(Diagnostic::indentation(
                    "unexpected indent",
                    first.line,
                    first.col + 1,
                ));
            }
            _ => {}
        }
        pending = block_header(line.tokens)?;
    }

    if complete {
        if let Some(header) = pending {
            return Err(Diagnostic::indentation(
                format!(
                    "expected an indented block after {} on line {}",
                    header.construct, header.line
                ),
                header.colon_line,
                header.colon_end_col + 1,
            ));
        }
    }
    Ok(())
}

fn logical_lines(tokens: &[Token]) -> Vec<LogicalLine<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut indented = false;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Indent => {
                indented = true;
                start = i + 1;
            }
            TokenKind::Dedent | TokenKind::EndMarker => start = i + 1,
            TokenKind::Newline => {
                if start < i {
                    lines.push(LogicalLine {
                        tokens: &tokens[start..i],
                        indented,
                    });
                }
                indented = false;
                start = i + 1;
            }
            _ => {}
        }
    }
    lines
}

/// Human name of the construct a header keyword opens, as used in CPython's
/// "expected an indented block after ..." messages.
fn construct_for(keyword: &str) -> Option<String> {
    match keyword {
        "def" => Some("function definition".to_string()),
        "class" => Some("class definition".to_string()),
        "if" | "elif" | "else" | "for" | "while" | "try" | "except" | "finally" | "with"
        | "match" | "case" => Some(format!("'{keyword}' statement")),
        _ => None,
    }
}

/// `match` and `case` are soft keywords: elsewhere they are plain names.
fn is_soft_keyword(keyword: &str) -> bool {
    matches!(keyword, "match" | "case")
}

/// Whether `token` can only start a `match` subject or `case` pattern, as
/// opposed to continuing an expression statement such as `match = 1`.
fn starts_subject(token: &Token) -> bool {
    match token.kind {
        TokenKind::Number | TokenKind::String => true,
        TokenKind::Name => !matches!(
            token.text.as_str(),
            "and" | "or" | "not" | "in" | "is" | "if" | "else" | "for"
        ),
        _ => false,
    }
}

/// Returns the header if `tokens` is a compound statement header whose body
/// starts on the next line, `None` for simple statements and one-line bodies.
fn block_header(tokens: &[Token]) -> Result<Option<BlockHeader>, Diagnostic> {
    let rest = match tokens {
        [first, rest @ ..] if first.is_name("async") && !rest.is_empty() => rest,
        _ => tokens,
    };
    let Some(keyword) = rest.first().filter(|t| t.kind == TokenKind::Name) else {
        return Ok(None);
    };
    let Some(construct) = construct_for(&keyword.text) else {
        return Ok(None);
    };
    let soft = is_soft_keyword(&keyword.text);
    if soft && rest.len() == 1 {
        return Ok(None);
    }

    let mut depth = 0usize;
    let mut lambdas = 0usize;
    for (i, token) in rest.iter().enumerate() {
        if token.is_name("lambda") {
            if depth == 0 {
                lambdas += 1;
            }
            continue;
        }
        if token.kind != TokenKind::Op {
            continue;
        }
        match token.text.as_str() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            ":" if depth == 0 && lambdas > 0 => lambdas -= 1,
            // `match: int = 1` annotates a variable
            ":" if depth == 0 && soft && i == 1 => return Ok(None),
            ":" if depth == 0 => {
                let body_on_next_line = i + 1 == rest.len();
                return Ok(body_on_next_line.then(|| BlockHeader {
                    construct,
                    line: keyword.line,
                    colon_line: token.end_line,
                    colon_end_col: token.end_col,
                }));
            }
            _ => {}
        }
    }

    if soft && !starts_subject(&rest[1]) {
        return Ok(None);
    }
    let last = rest.last().unwrap_or(keyword);
    Err(Diagnostic::syntax("expected ':'", last.end_line, last.end_col + 1))
}
