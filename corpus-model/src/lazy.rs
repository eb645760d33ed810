//! Build-once handle around [`SimilarityModel`].

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::{debug, warn};

use crate::corpus::Corpus;
use crate::errors::CorpusError;
use crate::model::SimilarityModel;

/// Lazily built, process-lifetime model for one corpus file.
///
/// The first caller of [`LazyModel::get`] loads the corpus and builds the
/// model; concurrent first callers wait on the build lock, so the build runs
/// exactly once. After that, reads are lock-free.
///
/// A failed build is not cached: the next call attempts it again.
#[derive(Debug)]
pub struct LazyModel {
    path: PathBuf,
    cell: OnceLock<SimilarityModel>,
    build_lock: Mutex<()>,
}

impl LazyModel {
    /// Handle that will build from the corpus file at `path` on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    /// Handle around an already built model.
    pub fn from_model(model: SimilarityModel) -> Self {
        Self {
            path: PathBuf::new(),
            cell: OnceLock::from(model),
            build_lock: Mutex::new(()),
        }
    }

    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the model, building it first if needed.
    ///
    /// # Errors
    /// Returns the `CorpusError` of the corpus load, unchanged.
    pub fn get(&self) -> Result<&SimilarityModel, CorpusError> {
        if let Some(model) = self.cell.get() {
            return Ok(model);
        }

        // The lock only guards the build; poisoning leaves no partial state.
        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = self.cell.get() {
            return Ok(model);
        }

        debug!(path = %self.path.display(), "LazyModel::get: building model");
        let corpus = Corpus::load(&self.path).inspect_err(|err| {
            warn!(path = %self.path.display(), error = %err, "LazyModel::get: corpus load failed");
        })?;
        let model = SimilarityModel::build(corpus);
        Ok(self.cell.get_or_init(|| model))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::corpus::SAMPLE_SEPARATOR;

    fn corpus_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builds_once_and_reuses() {
        let file = corpus_file(&format!("a = 1\n{SAMPLE_SEPARATOR}\nb = 2\n"));
        let lazy = LazyModel::new(file.path());
        assert!(!lazy.is_built());

        let first = lazy.get().unwrap() as *const SimilarityModel;
        let second = lazy.get().unwrap() as *const SimilarityModel;
        assert!(lazy.is_built());
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_first_callers_share_one_model() {
        let file = corpus_file("def f():\n    return 1\n");
        let lazy = Arc::new(LazyModel::new(file.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                thread::spawn(move || lazy.get().unwrap() as *const SimilarityModel as usize)
            })
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn failed_build_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        let lazy = LazyModel::new(&path);

        assert!(matches!(lazy.get(), Err(CorpusError::NotFound { .. })));
        assert!(!lazy.is_built());

        std::fs::write(&path, "x = 1\n").unwrap();
        assert_eq!(lazy.get().unwrap().len(), 1);
    }

    #[test]
    fn empty_corpus_is_fatal() {
        let file = corpus_file(&format!("{SAMPLE_SEPARATOR}\n   \n"));
        let lazy = LazyModel::new(file.path());
        assert!(matches!(lazy.get(), Err(CorpusError::Empty { .. })));
    }

    #[test]
    fn prebuilt_model_is_ready() {
        let model = SimilarityModel::build(Corpus::from_snippets(["x = 1"]));
        let lazy = LazyModel::from_model(model);
        assert!(lazy.is_built());
        assert_eq!(lazy.get().unwrap().len(), 1);
    }
}
