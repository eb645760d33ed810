//! Corpus loader: splits a separator-delimited text file into code snippets.

use std::{fs, path::Path};

use tracing::debug;

use crate::errors::CorpusError;

/// Line that separates two snippets in a corpus file.
pub const SAMPLE_SEPARATOR: &str = "# ---- SAMPLE SEP ----";

/// Ordered, immutable sequence of training snippets.
///
/// A snippet's identity is its position; the order of the file is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    snippets: Vec<String>,
}

impl Corpus {
    /// Reads and splits the corpus file at `path`.
    ///
    /// # Errors
    /// - `CorpusError::NotFound` if the path does not exist
    /// - `CorpusError::Io` if the file cannot be read as UTF-8
    /// - `CorpusError::Empty` if no non-empty snippet was found
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CorpusError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let text = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let snippets = split_snippets(&text);
        if snippets.is_empty() {
            return Err(CorpusError::Empty {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), snippets = snippets.len(), "Corpus::load: done");
        Ok(Self { snippets })
    }

    /// Builds a corpus from in-memory snippets. Snippets are trimmed and
    /// blank ones are dropped, like when loading from a file.
    pub fn from_snippets<I, S>(snippets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snippets = snippets
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { snippets }
    }

    pub fn snippets(&self) -> &[String] {
        &self.snippets
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.snippets.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Splits corpus text on separator lines.
///
/// Lines inside a snippet are re-joined with `\n` and the snippet is trimmed.
/// Empty snippets are skipped; the text after the last separator counts as a
/// snippet of its own.
pub fn split_snippets(text: &str) -> Vec<String> {
    let mut snippets = Vec::new();
    let mut buf: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim() == SAMPLE_SEPARATOR {
            push_snippet(&mut snippets, &buf);
            buf.clear();
        } else {
            buf.push(line);
        }
    }
    push_snippet(&mut snippets, &buf);

    snippets
}

fn push_snippet(snippets: &mut Vec<String>, lines: &[&str]) {
    let code = lines.join("\n");
    let code = code.trim();
    if !code.is_empty() {
        snippets.push(code.to_string());
    }
}
