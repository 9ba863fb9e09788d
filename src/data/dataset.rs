// ============================================================
// Layer 4 — SST-2 Dataset Builder
// ============================================================
// Produces the three splits the trainer consumes:
//
//   <root>/sst/trees/{train,dev,test}.txt
//       │  SstTreeReader + Preprocessor   (first run only)
//       ▼
//   <cache_dir>/sst/preprocessed.json      train+dev, test
//       │  drop neutral, seeded shuffle, cut at split_ratio
//       ▼
//   SstCorpus { train, val, test }
//       │  build_vocab(vectors)            train split only
//       ▼
//   (Vocabulary, VectorTable)
//
// The vocabulary never sees validation or test tokens, so those
// splits map unseen words to <unk> exactly like new input would.
//
// Reference: Burn Book §4 (Datasets)
//            Socher et al. (2013) SST

use anyhow::Result;
use burn::data::dataset::Dataset;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::Path;

use crate::data::{
    corpus::SstTreeReader,
    preprocessor::Preprocessor,
    splitter::split_train_val,
    vocab::{PretrainedVectors, VectorTable, Vocabulary},
};
use crate::domain::example::{Example, PreprocessedCorpus, TreebankSplit};
use crate::domain::traits::CorpusSource;
use crate::infra::example_cache::ExampleCache;

// ─── SentimentDataset ─────────────────────────────────────────────────────────

/// One split of preprocessed examples.
#[derive(Debug, Clone, Default)]
pub struct SentimentDataset {
    examples: Vec<Example>,
}

impl SentimentDataset {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }
}

impl Dataset<Example> for SentimentDataset {
    fn get(&self, index: usize) -> Option<Example> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}

// ─── SstCorpus ────────────────────────────────────────────────────────────────

pub struct SstCorpus {
    pub train: SentimentDataset,
    pub val:   SentimentDataset,
    pub test:  SentimentDataset,
}

impl SstCorpus {
    /// Load the cached examples (building the cache from the raw
    /// treebank under `root` if needed), then split train/validation.
    pub fn load(root: &Path, cache_dir: &Path, split_ratio: f64, seed: u64) -> Result<Self> {
        let cache  = ExampleCache::new(cache_dir);
        let reader = SstTreeReader::under_root(root);
        let corpus = cache.load_or_build(|| preprocess_corpus(&reader))?;
        Self::from_preprocessed(corpus, split_ratio, seed)
    }

    pub fn from_preprocessed(corpus: PreprocessedCorpus, split_ratio: f64, seed: u64) -> Result<Self> {
        let corpus     = corpus.without_neutral();
        let mut rng    = StdRng::seed_from_u64(seed);
        let (train, val) = split_train_val(corpus.train, split_ratio, &mut rng)?;

        tracing::info!(
            "SST-2 splits: {} train, {} val, {} test",
            train.len(),
            val.len(),
            corpus.test.len()
        );

        Ok(Self {
            train: SentimentDataset::new(train),
            val:   SentimentDataset::new(val),
            test:  SentimentDataset::new(corpus.test),
        })
    }

    /// Build the vocabulary from the training split and give every
    /// entry a vector from `vectors_path` (N(0, 1) when missing).
    pub fn build_vocab<R: Rng>(&self, vectors_path: &Path, rng: &mut R) -> Result<(Vocabulary, VectorTable)> {
        let vocab = Vocabulary::build(self.train.examples().iter().map(|ex| ex.tokens.as_slice()));
        tracing::info!("Vocabulary built: {} entries", vocab.len());

        let pretrained = PretrainedVectors::load(vectors_path, &vocab)?;
        let table      = VectorTable::from_pretrained(&vocab, &pretrained, rng);
        Ok((vocab, table))
    }
}

/// Read every split from `source`, clean each sentence, merge
/// train with dev and drop neutral sentences.
pub fn preprocess_corpus<S: CorpusSource>(source: &S) -> Result<PreprocessedCorpus> {
    let preprocessor = Preprocessor::new();

    let pb = ProgressBar::new(source.size_hint().unwrap_or(0));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) Preprocessing")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let run = |split: TreebankSplit| -> Result<Vec<Example>> {
        let examples = source
            .load_split(split)?
            .into_iter()
            .map(|sentence| {
                pb.inc(1);
                Example::new(preprocessor.preprocess(&sentence.text), sentence.label)
            })
            .collect();
        Ok(examples)
    };

    let mut train = run(TreebankSplit::Train)?;
    train.extend(run(TreebankSplit::Dev)?);
    let test = run(TreebankSplit::Test)?;
    pb.finish_and_clear();

    Ok(PreprocessedCorpus { train, test }.without_neutral())
}
