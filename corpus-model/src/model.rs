//! TF-IDF vector space over character n-grams.
//!
//! Build once from a [`Corpus`]; afterwards the vocabulary, IDF weights and
//! per-snippet vectors are frozen. Queries are projected into the existing
//! vocabulary: n-grams the corpus never contained are dropped.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tracing::info;

use crate::corpus::Corpus;
use crate::ngram;

/// Sparse, L2-normalized feature vector sorted by feature index.
///
/// An empty vector is the zero vector (no known n-gram in the text).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Builds a unit vector from raw (index, weight) pairs.
    fn normalized(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, w)| w > 0.0);
        entries.sort_unstable_by_key(|&(idx, _)| idx);

        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }
        Self { entries }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Inner product via a merge over the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine similarity in `[0, 1]`; zero when either vector is the zero vector.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Frozen TF-IDF space together with the snippets it was built from.
///
/// Keeping the corpus inside the model guarantees that a vector index always
/// maps back to the snippet it was computed from.
#[derive(Debug, Clone)]
pub struct SimilarityModel {
    corpus: Corpus,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl SimilarityModel {
    /// Fits the vocabulary and IDF weights on `corpus` and vectorizes every snippet.
    ///
    /// Every observed n-gram is kept (minimum document frequency 1).
    /// IDF is smoothed: `ln((1 + N) / (1 + df)) + 1`.
    pub fn build(corpus: Corpus) -> Self {
        let started = Instant::now();

        let counts: Vec<BTreeMap<String, usize>> = corpus
            .snippets()
            .iter()
            .map(|s| ngram::ngram_counts(s))
            .collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        for doc in &counts {
            for gram in doc.keys() {
                let idx = *vocabulary.entry(gram.clone()).or_insert_with(|| {
                    doc_freq.push(0);
                    doc_freq.len() - 1
                });
                doc_freq[idx] += 1;
            }
        }

        let n_docs = corpus.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .iter()
            .map(|doc| weigh(doc, &vocabulary, &idf))
            .collect();

        info!(
            snippets = corpus.len(),
            vocabulary = vocabulary.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "SimilarityModel::build: corpus vectorized"
        );

        Self {
            corpus,
            vocabulary,
            idf,
            vectors,
        }
    }

    /// Projects `text` into the frozen space. Never extends the vocabulary;
    /// text sharing no n-gram with the corpus yields the zero vector.
    pub fn vectorize(&self, text: &str) -> SparseVector {
        weigh(&ngram::ngram_counts(text), &self.vocabulary, &self.idf)
    }

    /// Cosine similarity of `query` against every corpus vector, in corpus order.
    pub fn similarities(&self, query: &SparseVector) -> Vec<f64> {
        self.vectors.iter().map(|v| cosine(query, v)).collect()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// TF (raw count) × IDF for the n-grams present in the vocabulary, normalized.
fn weigh(
    counts: &BTreeMap<String, usize>,
    vocabulary: &HashMap<String, usize>,
    idf: &[f64],
) -> SparseVector {
    let entries = counts
        .iter()
        .filter_map(|(gram, &tf)| {
            vocabulary
                .get(gram)
                .map(|&idx| (idx, tf as f64 * idf[idx]))
        })
        .collect();
    SparseVector::normalized(entries)
}
