//! Character n-gram analyzer shared by corpus vectorization and queries.
//!
//! Text is lowercased and every run of two or more whitespace characters is
//! collapsed into a single space. N-grams are plain positional windows over the
//! resulting characters, crossing whitespace and word boundaries.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Shortest n-gram length (inclusive).
pub const MIN_NGRAM: usize = 3;
/// Longest n-gram length (inclusive).
pub const MAX_NGRAM: usize = 5;

static WHITESPACE_RUNS: OnceLock<Regex> = OnceLock::new();

fn whitespace_runs() -> &'static Regex {
    WHITESPACE_RUNS.get_or_init(|| Regex::new(r"\s\s+").expect("whitespace pattern is valid"))
}

/// Lowercases `text` and collapses whitespace runs.
pub fn normalize(text: &str) -> String {
    whitespace_runs()
        .replace_all(&text.to_lowercase(), " ")
        .into_owned()
}

/// All character n-grams of `text` for lengths `MIN_NGRAM..=MAX_NGRAM`,
/// shortest first. Lengths longer than the text produce nothing.
pub fn char_ngrams(text: &str) -> Vec<String> {
    let chars: Vec<char> = normalize(text).chars().collect();
    let longest = MAX_NGRAM.min(chars.len());

    let mut grams = Vec::new();
    for n in MIN_NGRAM..=longest {
        grams.extend(chars.windows(n).map(|w| w.iter().collect::<String>()));
    }
    grams
}

/// Term frequencies of the n-grams of `text`.
///
/// Ordered map so vocabulary construction is deterministic.
pub fn ngram_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for gram in char_ngrams(text) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}
