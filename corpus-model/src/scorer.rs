//! Naturalness scoring and nearest-example retrieval.

use serde::{Deserialize, Serialize};

use crate::errors::CorpusError;
use crate::lazy::LazyModel;
use crate::model::SimilarityModel;

/// Number of top similarities averaged into the naturalness score.
pub const DEFAULT_NATURALNESS_TOP_K: usize = 5;
/// Number of nearest corpus examples returned alongside a score.
pub const DEFAULT_SIMILAR_TOP_K: usize = 3;

/// One corpus snippet and its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarExample {
    /// Snippet text exactly as stored in the corpus.
    pub code: String,
    /// Cosine similarity in `[0, 1]`.
    pub score: f64,
}

/// Corpus indices paired with their similarity to `code`, best first.
///
/// The sort is stable, so among equal scores the earlier snippet wins.
pub fn rank(model: &SimilarityModel, code: &str) -> Vec<(usize, f64)> {
    let query = model.vectorize(code);
    let mut ranked: Vec<(usize, f64)> = model
        .similarities(&query)
        .into_iter()
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Mean of the `top_k` best similarities (`top_k` is at least 1 and at most
/// the corpus size). Blank input scores `0.0`.
pub fn naturalness(model: &SimilarityModel, code: &str, top_k: usize) -> f64 {
    if code.trim().is_empty() {
        return 0.0;
    }
    let ranked = rank(model, code);
    let take = top_k.max(1).min(ranked.len());
    if take == 0 {
        return 0.0;
    }
    ranked[..take].iter().map(|&(_, s)| s).sum::<f64>() / take as f64
}

/// The `k` corpus snippets most similar to `code`, best first.
/// Blank input yields no examples.
pub fn top_similar(model: &SimilarityModel, code: &str, k: usize) -> Vec<SimilarExample> {
    if code.trim().is_empty() {
        return Vec::new();
    }
    let snippets = model.corpus().snippets();
    rank(model, code)
        .into_iter()
        .take(k.max(1))
        .map(|(idx, score)| SimilarExample {
            code: snippets[idx].clone(),
            score,
        })
        .collect()
}

/// Scoring front end over a [`LazyModel`].
///
/// Blank input is answered without touching (or building) the model.
#[derive(Debug)]
pub struct NaturalnessScorer {
    model: LazyModel,
}

impl NaturalnessScorer {
    pub fn new(model: LazyModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &LazyModel {
        &self.model
    }

    /// Naturalness of `code` against the corpus.
    ///
    /// # Errors
    /// Propagates the corpus error if the model has to be built and cannot be.
    pub fn score(&self, code: &str, top_k: usize) -> Result<f64, CorpusError> {
        if code.trim().is_empty() {
            return Ok(0.0);
        }
        Ok(naturalness(self.model.get()?, code, top_k))
    }

    /// Nearest corpus examples for `code`.
    ///
    /// # Errors
    /// Propagates the corpus error if the model has to be built and cannot be.
    pub fn top_similar(&self, code: &str, k: usize) -> Result<Vec<SimilarExample>, CorpusError> {
        if code.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(top_similar(self.model.get()?, code, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;

    fn model(snippets: &[&str]) -> SimilarityModel {
        SimilarityModel::build(Corpus::from_snippets(snippets.iter().copied()))
    }

    #[test]
    fn blank_input_scores_zero() {
        let m = model(&["def f():\n    return 1"]);
        assert_eq!(naturalness(&m, "", 5), 0.0);
        assert_eq!(naturalness(&m, "   \n\t", 5), 0.0);
        assert!(top_similar(&m, "", 3).is_empty());
        assert!(top_similar(&m, "  ", 3).is_empty());
    }

    #[test]
    fn near_copy_scores_high() {
        let m = model(&["def f():\n    return 1"]);
        let score = naturalness(&m, "def f():\n    return 2", 5);
        assert!(score > 0.3, "score = {score}");
        assert!(score <= 1.0);
    }

    #[test]
    fn mean_over_top_k() {
        let m = model(&["alpha beta", "gamma delta", "epsilon zeta"]);
        let ranked = rank(&m, "alpha beta");
        let expected = (ranked[0].1 + ranked[1].1) / 2.0;
        assert!((naturalness(&m, "alpha beta", 2) - expected).abs() < 1e-12);
        // k larger than the corpus averages over the whole corpus
        let all = ranked.iter().map(|r| r.1).sum::<f64>() / 3.0;
        assert!((naturalness(&m, "alpha beta", 10) - all).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let m = model(&["same snippet", "other text", "same snippet"]);
        let ranked = rank(&m, "same snippet");
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 2);

        let unrelated = top_similar(&m, "qqqqqq", 3);
        let codes: Vec<&str> = unrelated.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["same snippet", "other text", "same snippet"]);
        assert!(unrelated.iter().all(|e| e.score == 0.0));
    }

    #[test]
    fn top_similar_returns_original_snippets() {
        let snippets = ["x = 1", "def g(a):\n    return a * 2", "print('hi')"];
        let m = model(&snippets);
        let found = top_similar(&m, "def g(b):\n    return b * 2", 2);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].code, snippets[1]);
        assert!(found[0].score >= found[1].score);
    }

    #[test]
    fn scorer_skips_model_for_blank_input() {
        let scorer = NaturalnessScorer::new(LazyModel::new("/definitely/not/here.txt"));
        assert_eq!(scorer.score("  ", 5).unwrap(), 0.0);
        assert!(scorer.top_similar("", 3).unwrap().is_empty());
        assert!(!scorer.model().is_built());
        assert!(matches!(
            scorer.score("x = 1", 5),
            Err(CorpusError::NotFound { .. })
        ));
    }
}
