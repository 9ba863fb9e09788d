// ============================================================
// Layer 2 — Preprocess Use Case
// ============================================================
// Builds the example cache without training, so the slow
// tokenise / tag / lemmatise step can be run once up front.
// An existing cache is read back and reported, not rebuilt.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::{corpus::SstTreeReader, dataset::preprocess_corpus};
use crate::domain::example::Sentiment;
use crate::infra::example_cache::ExampleCache;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessReport {
    pub cache_path: PathBuf,
    pub train:      usize,
    pub test:       usize,
    pub positive:   usize,
    pub negative:   usize,
}

pub struct PreprocessUseCase {
    data_root: PathBuf,
    cache_dir: PathBuf,
}

impl PreprocessUseCase {
    pub fn new(data_root: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self { data_root: data_root.into(), cache_dir: cache_dir.into() }
    }

    pub fn execute(&self) -> Result<PreprocessReport> {
        let cache  = ExampleCache::new(&self.cache_dir);
        let reader = SstTreeReader::under_root(&self.data_root);
        let corpus = cache.load_or_build(|| preprocess_corpus(&reader))?;

        let positive = corpus
            .train
            .iter()
            .chain(&corpus.test)
            .filter(|ex| ex.label == Sentiment::Positive)
            .count();

        Ok(PreprocessReport {
            cache_path: cache.path().to_path_buf(),
            train:      corpus.train.len(),
            test:       corpus.test.len(),
            positive,
            negative:   corpus.train.len() + corpus.test.len() - positive,
        })
    }
}
