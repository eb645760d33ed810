//! Python tokenizer.
//!
//! Produces names, numbers, strings, operators and the NEWLINE / INDENT /
//! DEDENT structure tokens, and reports lexical errors worded the way CPython
//! words them. Tokenizing stops at the first error; the tokens produced up to
//! that point are still returned so later passes can look at the valid prefix.

use std::sync::OnceLock;

use regex::Regex;

use crate::diagnostic::Diagnostic;

/// CPython's limit on bracket nesting.
const MAX_NESTING: usize = 200;
const TAB_SIZE: usize = 8;

const OPERATORS_3: [&str; 5] = ["**=", "//=", ">>=", "<<=", "..."];
const OPERATORS_2: [&str; 19] = [
    "!=", "%=", "&=", "**", "*=", "+=", "-=", "->", "//", "/=", ":=", "<<", "<=", "==", ">=",
    ">>", "@=", "^=", "|=",
];
const OPERATORS_1: &str = "%&*+,-./:;<=>@^|~";

const STRING_PREFIXES: [&str; 8] = ["r", "u", "b", "f", "br", "rb", "fr", "rf"];

/// Keywords allowed to follow a number without a space, as in `1if x else 2`.
const KEYWORDS_AFTER_NUMBER: [&str; 8] = ["and", "else", "for", "if", "in", "is", "not", "or"];

static NUMBER: OnceLock<Regex> = OnceLock::new();

fn number_literal() -> &'static Regex {
    NUMBER.get_or_init(|| {
        Regex::new(
            r"^(?:0[xX](?:_?[0-9a-fA-F])+|0[oO](?:_?[0-7])+|0[bB](?:_?[01])+|(?:\d(?:_?\d)*(?:\.(?:\d(?:_?\d)*)?)?|\.\d(?:_?\d)*)(?:[eE][+-]?\d(?:_?\d)*)?[jJ]?)$",
        )
        .expect("number pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Number,
    String,
    Op,
    Newline,
    Indent,
    Dedent,
    EndMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line of the first character.
    pub line: usize,
    /// 0-based character column of the first character.
    pub col: usize,
    pub end_line: usize,
    /// 0-based character column just past the last character.
    pub end_col: usize,
}

impl Token {
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }

    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.text == name
    }

    /// NAME, NUMBER, STRING or OP.
    pub fn is_content(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Name | TokenKind::Number | TokenKind::String | TokenKind::Op
        )
    }
}

/// Tokenizer output: the tokens read so far and the error that stopped it, if any.
#[derive(Debug, Clone)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub error: Option<Diagnostic>,
}

impl Lexed {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

pub fn tokenize(source: &str) -> Lexed {
    let mut lexer = Lexer::new(source);
    let error = lexer.scan().err();
    Lexed {
        tokens: lexer.tokens,
        error,
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    /// Indentation stack as (column with tabs to 8, column with tabs to 1).
    indents: Vec<(usize, usize)>,
    /// Open brackets as (char, line, col).
    brackets: Vec<(char, usize, usize)>,
    at_line_start: bool,
    /// Set after a backslash continuation: the next line carries no indentation.
    joined: bool,
}

impl Lexer {
    fn new(source: &str) -> Self {
        let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            chars: normalized.chars().collect(),
            pos: 0,
            line: 1,
            col: 0,
            tokens: Vec::new(),
            indents: vec![(0, 0)],
            brackets: Vec::new(),
            at_line_start: true,
            joined: false,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn keyword_ahead(&self) -> bool {
        KEYWORDS_AFTER_NUMBER.iter().any(|keyword| {
            keyword.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c))
                && !self.peek(keyword.len()).is_some_and(is_ident_continue)
        })
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, line: usize, col: usize) {
        self.tokens.push(Token {
            kind,
            text: text.into(),
            line,
            col,
            end_line: self.line,
            end_col: self.col,
        });
    }

    fn scan(&mut self) -> Result<(), Diagnostic> {
        loop {
            if self.at_line_start {
                self.at_line_start = false;
                let measure = self.brackets.is_empty() && !self.joined;
                self.joined = false;
                if measure && !self.indentation()? {
                    continue;
                }
            }

            let Some(c) = self.peek(0) else {
                return self.finish();
            };
            match c {
                ' ' | '\t' | '\x0c' => {
                    self.bump();
                }
                '#' => self.skip_comment(),
                '\n' => self.newline(),
                '\\' => self.continuation()?,
                '"' | '\'' => self.string(self.line, self.col, String::new())?,
                '.' if self.peek(1).is_some_and(|n| n.is_ascii_digit()) => self.number()?,
                c if c.is_ascii_digit() => self.number()?,
                c if is_ident_start(c) => self.name_or_prefixed_string()?,
                '(' | '[' | '{' => self.open_bracket(c)?,
                ')' | ']' | '}' => self.close_bracket(c)?,
                _ => self.operator(c)?,
            }
        }
    }

    /// Measures the indentation of a new logical line and emits INDENT/DEDENT.
    /// Returns `false` for blank and comment-only lines, which are skipped.
    fn indentation(&mut self) -> Result<bool, Diagnostic> {
        let (mut col, mut alt) = (0usize, 0usize);
        while let Some(c) = self.peek(0) {
            match c {
                ' ' => {
                    col += 1;
                    alt += 1;
                }
                '\t' => {
                    col = (col / TAB_SIZE + 1) * TAB_SIZE;
                    alt += 1;
                }
                '\x0c' => {
                    col = 0;
                    alt = 0;
                }
                _ => break,
            }
            self.bump();
        }

        match self.peek(0) {
            None => return Ok(false),
            Some('#') => self.skip_comment(),
            Some('\n') => {}
            Some(_) => {
                self.dedent_or_indent(col, alt)?;
                return Ok(true);
            }
        }

        if self.peek(0) == Some('\n') {
            self.bump();
            self.at_line_start = true;
        }
        Ok(false)
    }

    fn dedent_or_indent(&mut self, col: usize, alt: usize) -> Result<(), Diagnostic> {
        let line = self.line;
        let &(top, top_alt) = self.indents.last().unwrap_or(&(0, 0));

        if col == top {
            if alt != top_alt {
                return Err(inconsistent_tabs(line, col));
            }
        } else if col > top {
            if alt <= top_alt {
                return Err(inconsistent_tabs(line, col));
            }
            self.indents.push((col, alt));
            self.tokens.push(Token {
                kind: TokenKind::Indent,
                text: String::new(),
                line,
                col: 0,
                end_line: line,
                end_col: col,
            });
        } else {
            while self.indents.len() > 1 && self.indents.last().is_some_and(|&(c, _)| col < c) {
                self.indents.pop();
                self.push(TokenKind::Dedent, "", line, col);
            }
            let &(top, top_alt) = self.indents.last().unwrap_or(&(0, 0));
            if col != top {
                return Err(Diagnostic::indentation(
                    "unindent does not match any outer indentation level",
                    line,
                    col + 1,
                ));
            }
            if alt != top_alt {
                return Err(inconsistent_tabs(line, col));
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) {
        while self.peek(0).is_some_and(|c| c != '\n') {
            self.bump();
        }
    }

    fn newline(&mut self) {
        let (line, col) = (self.line, self.col);
        let ends_statement = self.brackets.is_empty()
            && self.tokens.last().is_some_and(|t| t.is_content());
        self.bump();
        if ends_statement {
            self.tokens.push(Token {
                kind: TokenKind::Newline,
                text: "\n".into(),
                line,
                col,
                end_line: line,
                end_col: col + 1,
            });
        }
        self.at_line_start = true;
    }

    fn continuation(&mut self) -> Result<(), Diagnostic> {
        let (line, col) = (self.line, self.col);
        self.bump();
        match self.peek(0) {
            Some('\n') => {
                self.bump();
                self.at_line_start = true;
                self.joined = true;
                Ok(())
            }
            None => Err(Diagnostic::syntax("unexpected EOF while parsing", line, col + 1)),
            Some(_) => Err(Diagnostic::syntax(
                "unexpected character after line continuation character",
                line,
                col + 2,
            )),
        }
    }

    /// Reads a string literal whose (optional) prefix has already been consumed.
    fn string(&mut self, line: usize, col: usize, prefix: String) -> Result<(), Diagnostic> {
        let mut text = prefix;
        let Some(quote) = self.bump() else {
            return Ok(());
        };
        text.push(quote);

        let triple = self.peek(0) == Some(quote) && self.peek(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
            text.push(quote);
            text.push(quote);
        }

        loop {
            match self.peek(0) {
                None => return Err(self.unterminated(triple, line, col)),
                Some('\n') if !triple => return Err(self.unterminated(false, line, col)),
                Some('\\') => {
                    self.bump();
                    text.push('\\');
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                Some(c) if c == quote => {
                    self.bump();
                    text.push(c);
                    if !triple {
                        break;
                    }
                    if self.peek(0) == Some(quote) && self.peek(1) == Some(quote) {
                        self.bump();
                        self.bump();
                        text.push(quote);
                        text.push(quote);
                        break;
                    }
                }
                Some(c) => {
                    self.bump();
                    text.push(c);
                }
            }
        }

        self.push(TokenKind::String, text, line, col);
        Ok(())
    }

    fn unterminated(&self, triple: bool, line: usize, col: usize) -> Diagnostic {
        // Input ending in a newline is detected on the last line that has text.
        let detected = if self.col == 0 && self.line > line {
            self.line - 1
        } else {
            self.line
        };
        let what = if triple {
            "unterminated triple-quoted string literal"
        } else {
            "unterminated string literal"
        };
        Diagnostic::syntax(format!("{what} (detected at line {detected})"), line, col + 1)
    }

    fn number(&mut self) -> Result<(), Diagnostic> {
        let (line, col) = (self.line, self.col);
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            let exponent_sign = (c == '+' || c == '-')
                && text.ends_with(['e', 'E'])
                && !has_radix_prefix(&text);
            if c.is_ascii_alphabetic() && !continues_radix(&text, c) && self.keyword_ahead() {
                break;
            }
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if !number_literal().is_match(&text) {
            let lower = text.to_ascii_lowercase();
            let what = if lower.starts_with("0x") {
                "hexadecimal"
            } else if lower.starts_with("0o") {
                "octal"
            } else if lower.starts_with("0b") {
                "binary"
            } else {
                "decimal"
            };
            return Err(Diagnostic::syntax(
                format!("invalid {what} literal"),
                line,
                col + 1,
            ));
        }

        if is_zero_padded_integer(&text) {
            return Err(Diagnostic::syntax(
                "leading zeros in decimal integer literals are not permitted; \
                 use an 0o prefix for octal integers",
                line,
                col + 1,
            ));
        }

        self.push(TokenKind::Number, text, line, col);
        Ok(())
    }

    fn name_or_prefixed_string(&mut self) -> Result<(), Diagnostic> {
        let (line, col) = (self.line, self.col);
        let mut text = String::new();
        while let Some(c) = self.peek(0).filter(|&c| is_ident_continue(c)) {
            text.push(c);
            self.bump();
        }

        let quote_follows = matches!(self.peek(0), Some('"' | '\''));
        if quote_follows && STRING_PREFIXES.contains(&text.to_ascii_lowercase().as_str()) {
            return self.string(line, col, text);
        }

        self.push(TokenKind::Name, text, line, col);
        Ok(())
    }

    fn open_bracket(&mut self, c: char) -> Result<(), Diagnostic> {
        let (line, col) = (self.line, self.col);
        if self.brackets.len() >= MAX_NESTING {
            return Err(Diagnostic::syntax("too many nested parentheses", line, col + 1));
        }
        self.brackets.push((c, line, col));
        self.bump();
        self.push(TokenKind::Op, c.to_string(), line, col);
        Ok(())
    }

    fn close_bracket(&mut self, c: char) -> Result<(), Diagnostic> {
        let (line, col) = (self.line, self.col);
        match self.brackets.pop() {
            None => Err(Diagnostic::syntax(format!("unmatched '{c}'"), line, col + 1)),
            Some((open, open_line, _)) if closer_of(open) != c => {
                let message = if open_line == line {
                    format!("closing parenthesis '{c}' does not match opening parenthesis '{open}'")
                } else {
                    format!(
                        "closing parenthesis '{c}' does not match opening parenthesis '{open}' on line {open_line}"
                    )
                };
                Err(Diagnostic::syntax(message, line, col + 1))
            }
            Some(_) => {
                self.bump();
                self.push(TokenKind::Op, c.to_string(), line, col);
                Ok(())
            }
        }
    }

    fn operator(&mut self, c: char) -> Result<(), Diagnostic> {
        let (line, col) = (self.line, self.col);
        let ahead = |n: usize| -> String { (0..n).filter_map(|i| self.peek(i)).collect() };

        let three = ahead(3);
        let two = ahead(2);
        let width = if OPERATORS_3.contains(&three.as_str()) {
            3
        } else if OPERATORS_2.contains(&two.as_str()) {
            2
        } else if OPERATORS_1.contains(c) {
            1
        } else {
            let message = match c {
                '$' | '?' | '`' | '!' => "invalid syntax".to_string(),
                c if c.is_control() => format!("invalid non-printable character U+{:04X}", c as u32),
                c => format!("invalid character '{c}' (U+{:04X})", c as u32),
            };
            return Err(Diagnostic::syntax(message, line, col + 1));
        };

        let text = ahead(width);
        for _ in 0..width {
            self.bump();
        }
        self.push(TokenKind::Op, text, line, col);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Diagnostic> {
        if let Some(&(open, line, col)) = self.brackets.last() {
            return Err(Diagnostic::syntax(
                format!("'{open}' was never closed"),
                line,
                col + 1,
            ));
        }

        let (line, col) = (self.line, self.col);
        if self.tokens.last().is_some_and(|t| t.is_content()) {
            self.push(TokenKind::Newline, "", line, col);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, "", line, col);
        }
        self.push(TokenKind::EndMarker, "", line, col);
        Ok(())
    }
}

fn inconsistent_tabs(line: usize, col: usize) -> Diagnostic {
    Diagnostic::tab(
        "inconsistent use of tabs and spaces in indentation",
        line,
        col + 1,
    )
}

fn closer_of(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn has_radix_prefix(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with("0x") || lower.starts_with("0o") || lower.starts_with("0b")
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// `c` extends `text` as a radix prefix or a hexadecimal digit.
fn continues_radix(text: &str, c: char) -> bool {
    let lower = text.to_ascii_lowercase();
    (lower == "0" && matches!(c.to_ascii_lowercase(), 'x' | 'o' | 'b'))
        || (lower.starts_with("0x") && c.is_ascii_hexdigit())
}

/// Plain decimal integer such as `01` or `0_7`; all-zero forms like `00`
/// stay valid.
fn is_zero_padded_integer(text: &str) -> bool {
    text.starts_with('0')
        && text.chars().all(|c| c.is_ascii_digit() || c == '_')
        && text.chars().any(|c| matches!(c, '1'..='9'))
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let lexed = tokenize(source);
        assert!(lexed.error.is_none(), "unexpected error: {:?}", lexed.error);
        lexed.tokens.iter().map(|t| t.kind).collect()
    }

    fn error(source: &str) -> Diagnostic {
        tokenize(source).error.expect("expected a tokenizer error")
    }

    #[test]
    fn indentation_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("def f():\n    return 1\n"),
            vec![
                Name, Name, Op, Op, Op, Newline, Indent, Name, Number, Newline, Dedent, EndMarker
            ]
        );
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        use TokenKind::*;
        assert_eq!(
            kinds("x = 1\n\n   # note\n\ny = 2"),
            vec![Name, Op, Number, Newline, Name, Op, Number, Newline, EndMarker]
        );
        assert_eq!(kinds(""), vec![EndMarker]);
        assert_eq!(kinds("   \n\t\n"), vec![EndMarker]);
    }

    #[test]
    fn brackets_join_lines() {
        use TokenKind::*;
        assert_eq!(
            kinds("x = (1,\n        2)\n"),
            vec![Name, Op, Op, Number, Op, Number, Op, Newline, EndMarker]
        );
        assert_eq!(
            kinds("x = 1 + \\\n    2\n"),
            vec![Name, Op, Number, Op, Number, Newline, EndMarker]
        );
    }

    #[test]
    fn strings_with_prefixes_escapes_and_triples() {
        let lexed = tokenize("a = rb'x\\'y'\nb = \"\"\"one\ntwo\"\"\"\nc = f\"{d['k']}\"\n");
        assert!(lexed.error.is_none());
        let strings: Vec<&str> = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::String)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(strings, vec!["rb'x\\'y'", "\"\"\"one\ntwo\"\"\"", "f\"{d['k']}\""]);
    }

    #[test]
    fn multi_char_operators() {
        let lexed = tokenize("x **= y // z -> w := v ...");
        let ops: Vec<&str> = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Op)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["**=", "//", "->", ":=", "..."]);
    }

    #[test]
    fn numbers() {
        for ok in ["1", "1_000", "0x1F", "0o17", "0b101", "1.5", ".5", "1.", "1e-5", "2.5E+3j"] {
            assert!(tokenize(ok).error.is_none(), "{ok} should lex");
        }
        assert_eq!(error("x = 1abc").message, "invalid decimal literal");
        assert_eq!(error("x = 0xZZ").message, "invalid hexadecimal literal");
    }

    #[test]
    fn zero_padded_integers() {
        for ok in ["0", "00", "0_0", "01.5", "01e3", "01j", "0o17"] {
            assert!(tokenize(ok).error.is_none(), "{ok} should lex");
        }
        let d = error("x = 01");
        assert_eq!(
            d.message,
            "leading zeros in decimal integer literals are not permitted; \
             use an 0o prefix for octal integers"
        );
        assert_eq!((d.line, d.col), (Some(1), Some(5)));
        assert!(error("y = 0_7").message.starts_with("leading zeros"));
    }

    #[test]
    fn keyword_right_after_number() {
        let lexed = tokenize("x = 1if y else 2");
        assert!(lexed.error.is_none(), "{:?}", lexed.error);
        let words: Vec<&str> = lexed
            .tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Name | TokenKind::Number))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(words, ["x", "1", "if", "y", "else", "2"]);

        for ok in ["b = 1or 2", "c = 0b1or 2", "d = 1.5else"] {
            assert!(tokenize(ok).error.is_none(), "{ok} should lex");
        }
        assert_eq!(error("x = 1andy").message, "invalid decimal literal");
    }

    #[test]
    fn unterminated_strings() {
        let d = error("x = 'abc");
        assert_eq!(d.message, "unterminated string literal (detected at line 1)");
        assert_eq!((d.line, d.col), (Some(1), Some(5)));

        let d = error("s = \"\"\"abc\nmore\n");
        assert_eq!(d.message, "unterminated triple-quoted string literal (detected at line 2)");
        assert_eq!(d.line, Some(1));
    }

    #[test]
    fn bracket_errors() {
        let d = error("print((1+2)");
        assert_eq!(d.message, "'(' was never closed");
        assert_eq!((d.line, d.col), (Some(1), Some(6)));

        assert_eq!(error("x = 1)").message, "unmatched ')'");
        assert_eq!(
            error("x = (1]").message,
            "closing parenthesis ']' does not match opening parenthesis '('"
        );
        assert_eq!(
            error("x = (1,\n2]").message,
            "closing parenthesis ']' does not match opening parenthesis '(' on line 1"
        );
    }

    #[test]
    fn indentation_errors() {
        let d = error("if x:\n        a\n    b\n");
        assert_eq!(d.kind, DiagnosticKind::IndentationError);
        assert_eq!(d.message, "unindent does not match any outer indentation level");
        assert_eq!(d.line, Some(3));

        let d = error("if x:\n\ta\n        b\n");
        assert_eq!(d.kind, DiagnosticKind::TabError);
    }

    #[test]
    fn invalid_characters() {
        assert_eq!(error("x = $y").message, "invalid syntax");
        assert_eq!(error("x = 1 € 2").message, "invalid character '€' (U+20AC)");
        assert_eq!(
            error("x = 1 \\ 2").message,
            "unexpected character after line continuation character"
        );
        assert_eq!(error("x = 1 + \\").message, "unexpected EOF while parsing");
    }

    #[test]
    fn keeps_tokens_before_an_error() {
        let lexed = tokenize("def f(x)\n    return 'oops");
        assert!(!lexed.is_complete());
        assert!(lexed.tokens.iter().any(|t| t.is_name("def")));
        assert!(lexed.tokens.iter().any(|t| t.kind == TokenKind::Newline));
    }

    #[test]
    fn token_positions() {
        let lexed = tokenize("def f(x)");
        let close = lexed.tokens.iter().find(|t| t.is_op(")")).unwrap();
        assert_eq!((close.line, close.col, close.end_col), (1, 7, 8));
    }
}
