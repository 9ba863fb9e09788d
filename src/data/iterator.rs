// ============================================================
// Layer 4 — Batch Iterator
// ============================================================
// Describes how one split is batched: the examples, a fixed
// batch size, the shared batcher (vocabulary + fix_length) and
// an optional shuffle seed. `loader()` turns that description
// into a Burn DataLoader on a given backend and device.
//
//   SentimentDataset ──DataLoaderBuilder──▶ DataLoader<B, SentimentBatch<B>>
//                        .batch_size(n)
//                        .shuffle(seed)     (shuffled splits only)
//
// Burn's loader gives the pass semantics directly:
//   - each `iter()` starts a fresh, non-repeating pass
//   - with a seed, every pass draws a new order from one seeded
//     rng, so reruns with the same seed repeat the same orders
//   - the last batch holds the remainder and may be short; an
//     empty batch is never produced
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use anyhow::{ensure, Context, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};
use std::sync::Arc;

use crate::data::{
    batcher::{SentimentBatch, SentimentBatcher},
    dataset::SentimentDataset,
    vocab::Vocabulary,
};
use crate::domain::example::Example;

/// Loader for one split, on backend `B`
pub type SplitLoader<B> = Arc<dyn DataLoader<B, SentimentBatch<B>>>;

pub struct BatchIterator {
    dataset:    Arc<SentimentDataset>,
    batcher:    SentimentBatcher,
    batch_size: usize,
    shuffle:    Option<u64>,
}

impl BatchIterator {
    pub fn new(
        dataset:    &SentimentDataset,
        vocab:      Arc<Vocabulary>,
        batch_size: usize,
        fix_length: usize,
        shuffle:    bool,
        seed:       u64,
    ) -> Result<Self> {
        ensure!(batch_size > 0, "batch size must be positive");
        ensure!(fix_length > 0, "sequence length must be positive");

        for (i, example) in dataset.examples().iter().enumerate() {
            example
                .label
                .class_index()
                .with_context(|| format!("example {i} is neutral and has no binary class"))?;
        }

        Ok(Self {
            dataset: Arc::new(dataset.clone()),
            batcher: SentimentBatcher::new(vocab, fix_length),
            batch_size,
            shuffle: shuffle.then_some(seed),
        })
    }

    /// Build a DataLoader whose batches land on `device`.
    ///
    /// Keep the loader for as long as passes should keep
    /// reshuffling; a freshly built one restarts the sequence.
    pub fn loader<B: Backend>(&self, device: &B::Device) -> SplitLoader<B> {
        let builder = DataLoaderBuilder::<B, Example, SentimentBatch<B>>::new(self.batcher.clone())
            .batch_size(self.batch_size)
            .set_device(device.clone());

        let builder = match self.shuffle {
            Some(seed) => builder.shuffle(seed),
            None       => builder,
        };

        builder.build(Arc::clone(&self.dataset))
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.dataset.examples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.examples().is_empty()
    }

    pub fn num_batches(&self) -> usize {
        self.len().div_ceil(self.batch_size)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn fix_length(&self) -> usize {
        self.batcher.fix_length()
    }

    pub fn shuffles(&self) -> bool {
        self.shuffle.is_some()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::PAD_INDEX;
    use crate::domain::example::Sentiment;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn setup(n: usize) -> (SentimentDataset, Arc<Vocabulary>) {
        let examples: Vec<Example> = (0..n)
            .map(|i| {
                let label = if i % 2 == 0 { Sentiment::Positive } else { Sentiment::Negative };
                Example::new(vec![format!("w{i}"); 1 + i % 3], label)
            })
            .collect();
        let vocab = Vocabulary::build(examples.iter().map(|e| e.tokens.as_slice()));
        (SentimentDataset::new(examples), Arc::new(vocab))
    }

    fn pass(loader: &SplitLoader<TestBackend>) -> Vec<Vec<i64>> {
        loader
            .iter()
            .map(|b| b.tokens.into_data().convert::<i64>().to_vec().unwrap())
            .collect()
    }

    #[test]
    fn test_batches_cover_split_with_short_last_batch() {
        let (ds, vocab) = setup(10);
        let it     = BatchIterator::new(&ds, vocab, 4, 5, false, 0).unwrap();
        let loader = it.loader::<TestBackend>(&Default::default());

        let shapes: Vec<[usize; 2]> = loader.iter().map(|b| b.tokens.dims()).collect();
        assert_eq!(shapes, vec![[4, 5], [4, 5], [2, 5]]);
        assert_eq!(it.num_batches(), 3);
        assert_eq!(loader.num_items(), 10);

        let labels: usize = loader.iter().map(|b| b.len()).sum();
        assert_eq!(labels, 10);
    }

    #[test]
    fn test_rows_are_padded_to_fix_length() {
        let (ds, vocab) = setup(3);
        let it    = BatchIterator::new(&ds, Arc::clone(&vocab), 8, 4, false, 0).unwrap();
        let batch = it.loader::<TestBackend>(&Default::default()).iter().next().unwrap();

        let tokens: Vec<i64> = batch.tokens.into_data().convert::<i64>().to_vec().unwrap();
        // example 0 has a single token
        assert_eq!(tokens[0], vocab.index_of("w0") as i64);
        assert!(tokens[1..4].iter().all(|&t| t == PAD_INDEX as i64));

        let labels: Vec<i64> = batch.labels.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(labels, vec![1, 0, 1]);
    }

    #[test]
    fn test_each_pass_reshuffles_deterministically() {
        let (ds, vocab) = setup(32);
        let a = BatchIterator::new(&ds, Arc::clone(&vocab), 8, 3, true, 9).unwrap();
        let b = BatchIterator::new(&ds, vocab, 8, 3, true, 9).unwrap();

        let la = a.loader::<TestBackend>(&Default::default());
        let lb = b.loader::<TestBackend>(&Default::default());

        let a1 = pass(&la);
        let a2 = pass(&la);
        assert_ne!(a1, a2);
        assert_eq!(a1, pass(&lb));
        assert_eq!(a2, pass(&lb));
    }

    #[test]
    fn test_unshuffled_passes_repeat() {
        let (ds, vocab) = setup(7);
        let it     = BatchIterator::new(&ds, vocab, 3, 2, false, 0).unwrap();
        let loader = it.loader::<TestBackend>(&Default::default());
        assert!(!it.shuffles());
        assert_eq!(pass(&loader), pass(&loader));
    }

    #[test]
    fn test_empty_split_yields_no_batches() {
        let (ds, vocab) = setup(0);
        let it = BatchIterator::new(&ds, vocab, 4, 2, true, 0).unwrap();
        assert!(it.is_empty());
        assert_eq!(it.loader::<TestBackend>(&Default::default()).iter().count(), 0);
    }

    #[test]
    fn test_rejects_zero_sizes_and_neutral_examples() {
        let (ds, vocab) = setup(2);
        assert!(BatchIterator::new(&ds, Arc::clone(&vocab), 0, 4, false, 0).is_err());
        assert!(BatchIterator::new(&ds, Arc::clone(&vocab), 4, 0, false, 0).is_err());

        let neutral = SentimentDataset::new(vec![Example::new(vec![], Sentiment::Neutral)]);
        assert!(BatchIterator::new(&neutral, vocab, 4, 4, false, 0).is_err());
    }
}
