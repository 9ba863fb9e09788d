// ============================================================
// Layer 6 — Example Cache
// ============================================================
// Preprocessing all 11,855 treebank sentences (tokenising,
// tagging, lemmatising) is the slowest step before training.
// The result only depends on the raw corpus, so it is done once
// and written to:
//
//   <cache_dir>/sst/preprocessed.json
//
//   {
//     "train": [ { "tokens": ["grip", "film"], "label": "positive" }, ... ],
//     "test":  [ ... ]
//   }
//
// The cache holds the neutral-free train (+ dev) and test lists.
// It is read back verbatim on every later run; delete the file
// to force a rebuild.
//
// Reference: Rust Book §12 (I/O and File Handling)
//            serde_json crate documentation

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::example::PreprocessedCorpus;
use crate::domain::traits::Persistable;

const CACHE_FILE: &str = "preprocessed.json";

/// Stores the preprocessed corpus as JSON on disk.
impl Persistable for PreprocessedCorpus {
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create cache directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write cache to '{}'", path.display()))
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read cache from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cache file '{}' is corrupt; delete it to rebuild", path.display()))
    }
}

pub struct ExampleCache {
    path: PathBuf,
}

impl ExampleCache {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self { path: cache_dir.as_ref().join("sst").join(CACHE_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<PreprocessedCorpus> {
        PreprocessedCorpus::load(&self.path)
    }

    pub fn store(&self, corpus: &PreprocessedCorpus) -> Result<()> {
        corpus.save(&self.path)?;
        tracing::info!(
            "Cached {} train / {} test examples at '{}'",
            corpus.train.len(),
            corpus.test.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Return the cached corpus, or run `build` and cache what it returns
    pub fn load_or_build<F>(&self, build: F) -> Result<PreprocessedCorpus>
    where
        F: FnOnce() -> Result<PreprocessedCorpus>,
    {
        if self.exists() {
            tracing::info!("Loading preprocessed examples from '{}'", self.path.display());
            return self.load();
        }

        tracing::info!("No example cache at '{}', preprocessing corpus", self.path.display());
        let corpus = build()?;
        self.store(&corpus)?;
        Ok(corpus)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::example::{Example, Sentiment};
    use std::cell::Cell;

    fn corpus() -> PreprocessedCorpus {
        PreprocessedCorpus {
            train: vec![Example::new(vec!["grip".into(), "film".into()], Sentiment::Positive)],
            test:  vec![Example::new(vec!["dull".into()], Sentiment::Negative)],
        }
    }

    #[test]
    fn test_cache_path_layout() {
        let cache = ExampleCache::new("/tmp/cache");
        assert_eq!(cache.path(), Path::new("/tmp/cache/sst/preprocessed.json"));
    }

    #[test]
    fn test_build_runs_once_then_reads_back() {
        let dir   = tempfile::tempdir().unwrap();
        let cache = ExampleCache::new(dir.path());
        let calls = Cell::new(0);

        let first = cache
            .load_or_build(|| {
                calls.set(calls.get() + 1);
                Ok(corpus())
            })
            .unwrap();
        assert!(cache.exists());

        let second = cache
            .load_or_build(|| {
                calls.set(calls.get() + 1);
                Ok(PreprocessedCorpus::default())
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_build_writes_nothing() {
        let dir   = tempfile::tempdir().unwrap();
        let cache = ExampleCache::new(dir.path());
        assert!(cache.load_or_build(|| anyhow::bail!("no corpus")).is_err());
        assert!(!cache.exists());
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let dir   = tempfile::tempdir().unwrap();
        let cache = ExampleCache::new(dir.path());
        fs::create_dir_all(cache.path().parent().unwrap()).unwrap();
        fs::write(cache.path(), "{ not json").unwrap();
        assert!(cache.load().is_err());
    }
}
