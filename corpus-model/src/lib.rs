//! Reference-corpus model for code "naturalness".
//!
//! This crate provides:
//! - A loader for separator-delimited corpus files (`# ---- SAMPLE SEP ----`)
//! - A character n-gram (3..=5) TF-IDF vector space built once over the corpus
//! - Naturalness scoring (mean of the top-k cosine similarities) and
//!   nearest-example retrieval
//!
//! The model is immutable after construction. [`LazyModel`] wraps it so that
//! the expensive build runs at most once per process, on first use.

mod corpus;
mod errors;
mod lazy;
mod model;
pub mod ngram;
mod scorer;

pub use corpus::{Corpus, SAMPLE_SEPARATOR, split_snippets};
pub use errors::CorpusError;
pub use lazy::LazyModel;
pub use model::{SimilarityModel, SparseVector, cosine};
pub use scorer::{
    DEFAULT_NATURALNESS_TOP_K, DEFAULT_SIMILAR_TOP_K, NaturalnessScorer, SimilarExample,
    naturalness, rank, top_similar,
};
