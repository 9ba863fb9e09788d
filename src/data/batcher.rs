// ============================================================
// Layer 4 — Sentiment Batcher
// ============================================================
// Converts a mini-batch of Examples into tensors on the target
// device. This is what Burn's DataLoader calls for every batch.
//
//   Input:  Vec<Example> with N items
//   Output: SentimentBatch { tokens: [N, S] Int, labels: [N] Int }
//
// Every example is numericalised against the training
// vocabulary and padded / truncated to S = fix_length, so the
// flat token vector reshapes directly.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*, tensor::TensorData};
use std::sync::Arc;

use crate::data::vocab::Vocabulary;
use crate::domain::example::Example;

// ─── SentimentBatch ───────────────────────────────────────────────────────────
/// A batch ready for embedding lookup and the forward pass.
#[derive(Debug, Clone)]
pub struct SentimentBatch<B: Backend> {
    /// Token indices — shape: [batch_size, fix_length]
    pub tokens: Tensor<B, 2, Int>,

    /// Class indices — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

impl<B: Backend> SentimentBatch<B> {
    /// Number of examples in this batch
    pub fn len(&self) -> usize {
        self.labels.dims()[0]
    }
}

// ─── SentimentBatcher ─────────────────────────────────────────────────────────
/// Shares the vocabulary with every loader built from one environment.
#[derive(Clone, Debug)]
pub struct SentimentBatcher {
    vocab:      Arc<Vocabulary>,
    fix_length: usize,
}

impl SentimentBatcher {
    pub fn new(vocab: Arc<Vocabulary>, fix_length: usize) -> Self {
        Self { vocab, fix_length }
    }

    pub fn fix_length(&self) -> usize {
        self.fix_length
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
impl<B: Backend> Batcher<B, Example, SentimentBatch<B>> for SentimentBatcher {
    fn batch(&self, items: Vec<Example>, device: &B::Device) -> SentimentBatch<B> {
        let batch_size = items.len();

        // Burn Int tensors are created from i32 data
        let tokens: Vec<i32> = items
            .iter()
            .flat_map(|ex| self.vocab.numericalize(&ex.tokens, self.fix_length))
            .map(|t| t as i32)
            .collect();

        // Neutral examples are rejected when a split's loader is set up
        let labels: Vec<i32> = items
            .iter()
            .map(|ex| ex.label.class_index().unwrap_or_default() as i32)
            .collect();

        let tokens = Tensor::<B, 2, Int>::from_data(
            TensorData::new(tokens, [batch_size, self.fix_length]),
            device,
        );
        let labels = Tensor::<B, 1, Int>::from_data(TensorData::new(labels, [batch_size]), device);

        SentimentBatch { tokens, labels }
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

    #[test]
    fn test_batch_shapes_and_values() {
        let examples = vec![
            Example::new(vec!["great".into(), "film".into()], Sentiment::Positive),
            Example::new(vec!["dull".into(), "film".into(), "plot".into(), "dull".into()], Sentiment::Negative),
        ];
        let vocab   = Arc::new(Vocabulary::build(examples.iter().map(|e| e.tokens.as_slice())));
        let batcher = SentimentBatcher::new(Arc::clone(&vocab), 3);
        let device  = Default::default();

        let out: SentimentBatch<TestBackend> = batcher.batch(examples, &device);
        assert_eq!(out.tokens.dims(), [2, 3]);
        assert_eq!(out.labels.dims(), [2]);
        assert_eq!(out.len(), 2);

        let tokens: Vec<i64> = out.tokens.into_data().convert::<i64>().to_vec().unwrap();
        let idx = |w: &str| vocab.index_of(w) as i64;
        // the first row is padded, the second truncated
        assert_eq!(
            tokens,
            vec![idx("great"), idx("film"), PAD_INDEX as i64, idx("dull"), idx("film"), idx("plot")]
        );

        let labels: Vec<i64> = out.labels.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn test_unknown_tokens_map_to_unk() {
        let vocab   = Arc::new(Vocabulary::build([vec!["film".to_string()]].iter().map(|t| t.as_slice())));
        let batcher = SentimentBatcher::new(vocab, 2);

        let out: SentimentBatch<TestBackend> = batcher.batch(
            vec![Example::new(vec!["snoozefest".into()], Sentiment::Negative)],
            &Default::default(),
        );
        let tokens: Vec<i64> = out.tokens.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(tokens, vec![crate::data::vocab::UNK_INDEX as i64, PAD_INDEX as i64]);
    }
}
