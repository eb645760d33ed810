//! The analysis pipeline.

use std::time::Instant;

use corpus_model::{LazyModel, NaturalnessScorer};
use syntax_check::{PythonParser, SyntaxParser, classify};
use tracing::{debug, info};

use crate::{
    config::AnalyzerConfig,
    errors::AnalyzerResult,
    report::{AnalysisEnvelope, AnalysisReport, dataset_mismatch_issue},
};

/// Stateless per request; the corpus model is built once and shared.
///
/// Construct one per process and share it (e.g. behind an `Arc`).
pub struct CodeAnalyzer {
    cfg: AnalyzerConfig,
    scorer: NaturalnessScorer,
    parser: Box<dyn SyntaxParser>,
}

impl CodeAnalyzer {
    /// Analyzer over the corpus at `cfg.corpus_path` using the Python parser.
    ///
    /// With `cfg.eager_build` the model is built here; otherwise on the first
    /// non-blank request.
    pub fn new(cfg: AnalyzerConfig) -> AnalyzerResult<Self> {
        let model = LazyModel::new(cfg.corpus_path.clone());
        let parser = PythonParser::new()?;
        Self::with_parts(cfg, model, Box::new(parser))
    }

    /// Analyzer over explicit parts; used for prebuilt models and custom
    /// parsers.
    pub fn with_parts(
        cfg: AnalyzerConfig,
        model: LazyModel,
        parser: Box<dyn SyntaxParser>,
    ) -> AnalyzerResult<Self> {
        cfg.validate()?;
        let analyzer = Self {
            cfg,
            scorer: NaturalnessScorer::new(model),
            parser,
        };
        if analyzer.cfg.eager_build {
            analyzer.warm_up()?;
        }
        Ok(analyzer)
    }

    /// Builds the corpus model now if it is not built yet.
    pub fn warm_up(&self) -> AnalyzerResult<()> {
        self.scorer.model().get()?;
        Ok(())
    }

    /// Scores, retrieves similar examples and checks syntax.
    ///
    /// # Errors
    /// Only corpus failures; invalid code is reported inside the report.
    pub fn analyze(&self, code: &str) -> AnalyzerResult<AnalysisReport> {
        let started = Instant::now();

        let model_score = self.scorer.score(code, self.cfg.naturalness_top_k)?;
        let similar_examples = self.scorer.top_similar(code, self.cfg.similar_top_k)?;
        let verdict = classify(self.parser.as_ref(), code);

        let mut issues = Vec::with_capacity(2);
        let natural = model_score >= self.cfg.mismatch_threshold;
        if !natural {
            issues.push(dataset_mismatch_issue(model_score));
        }
        issues.extend(verdict.issue);

        let report = AnalysisReport {
            ok: natural && verdict.valid,
            issues,
            model_score,
            similar_examples,
        };

        info!(
            ok = report.ok,
            model_score = report.model_score,
            issues = report.issues.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analyze: done"
        );
        Ok(report)
    }

    /// [`Self::analyze`] wrapped in the response envelope.
    ///
    /// `apply_fix` is accepted for compatibility and ignored: no fixed code is
    /// ever produced.
    pub fn process(&self, code: &str, apply_fix: bool) -> AnalyzerResult<AnalysisEnvelope> {
        if apply_fix {
            debug!("process: apply_fix requested; automatic fixing is disabled");
        }
        Ok(AnalysisEnvelope {
            analysis: self.analyze(code)?,
            fixed_code: None,
        })
    }
}
