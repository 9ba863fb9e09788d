// ============================================================
// Layer 5 — Trainer
// ============================================================
// Owns the model, the word embedding, the loss and one Adam
// optimiser per module, and runs passes over an Environment.
//
//   train()       one epoch over env.train
//                   tokens → embedding → model → cross-entropy
//                   backward, Adam step on the model, and on the
//                   embedding unless the environment froze it
//
//   infer(test)   one pass over env.test (or env.val) with
//                   AutodiffModule::valid(): no gradients, no
//                   dropout, parameters untouched
//
// Batches come from Burn DataLoaders built once per trainer:
// the train loader on B, the val/test loaders on B::InnerBackend.
// Shuffled loaders draw a new order on every pass.
//
// Every step records Epoch, Time/Step, Time/Item, Loss and
// Accuracy/Top1 into the metrics accumulator (infer skips Loss).
// Both passes reset the accumulator first, so after train() the
// means describe that epoch's steps alone; nothing rolls over
// from an earlier train() or infer().
//
// Adam is configured as beta_1 = momentum, beta_2 = 0.999 with
// L2 weight decay.
//
// Key Burn insight:
//   - model.valid() returns the module on B::InnerBackend
//   - evaluation loaders must batch onto that inner backend
//   - argmax(1) returns [batch, 1], reshape before .equal()
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{anyhow, Context, Result};
use burn::{
    module::AutodiffModule,
    nn::loss::{CrossEntropyLoss, CrossEntropyLossConfig},
    optim::{decay::WeightDecayConfig, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::{sync::Arc, time::Instant};

use crate::data::{batcher::SentimentBatch, environment::Environment, iterator::SplitLoader};
use crate::ml::{
    embedding::WordEmbedding,
    evaluation::{self, EvaluationMetrics, TRAINER_METRICS},
    model::SentimentModel,
};

/// Optimiser hyper-parameters
#[derive(Debug, Clone, Copy)]
pub struct TrainerArgs {
    pub lr:           f64,
    pub momentum:     f64,
    pub weight_decay: f64,
}

impl TrainerArgs {
    pub fn adam(&self) -> AdamConfig {
        AdamConfig::new()
            .with_beta_1(self.momentum as _)
            .with_beta_2(0.999)
            .with_weight_decay(Some(WeightDecayConfig::new(self.weight_decay as _)))
    }
}

pub struct Trainer<B, M, O, E>
where
    B: AutodiffBackend,
{
    env:          Arc<Environment>,
    model:        M,
    embedding:    WordEmbedding<B>,
    model_optim:  O,
    embed_optim:  E,
    train_loader: SplitLoader<B>,
    val_loader:   SplitLoader<B::InnerBackend>,
    test_loader:  SplitLoader<B::InnerBackend>,
    loss:         CrossEntropyLoss<B>,
    lr:           f64,
    epoch:        usize,
    step:         usize,
    info:         EvaluationMetrics,
}

impl<B, M, O, E> Trainer<B, M, O, E>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + SentimentModel<B>,
    M::InnerModule: SentimentModel<B::InnerBackend>,
    O: Optimizer<M, B>,
    E: Optimizer<WordEmbedding<B>, B>,
{
    /// Build a trainer whose embedding starts from `env.vectors`.
    ///
    /// `model_optim` and `embed_optim` are usually both
    /// `args.adam().init()`.
    pub fn new(
        env:         Arc<Environment>,
        model:       M,
        model_optim: O,
        embed_optim: E,
        lr:          f64,
        device:      &B::Device,
    ) -> Self {
        let embedding = WordEmbedding::from_table(&env.vectors, device);
        let embedding = if env.trainable_embedding { embedding } else { embedding.no_grad() };

        let train_loader = env.train.loader::<B>(device);
        let val_loader   = env.val.loader::<B::InnerBackend>(device);
        let test_loader  = env.test.loader::<B::InnerBackend>(device);

        Self {
            env,
            model,
            embedding,
            model_optim,
            embed_optim,
            train_loader,
            val_loader,
            test_loader,
            loss:         CrossEntropyLossConfig::new().init(device),
            lr,
            epoch:        0,
            step:         0,
            info:         EvaluationMetrics::new(&TRAINER_METRICS),
        }
    }

    /// Replace the embedding, e.g. with one restored from a checkpoint
    pub fn with_embedding(mut self, embedding: WordEmbedding<B>) -> Self {
        self.embedding = if self.env.trainable_embedding { embedding } else { embedding.no_grad() };
        self
    }

    /// Set the epoch counter, e.g. after restoring a checkpoint
    pub fn with_epoch(mut self, epoch: usize) -> Self {
        self.epoch = epoch;
        self
    }

    /// Run one training epoch over `env.train`.
    pub fn train(&mut self) -> Result<()> {
        self.info.reset();
        let trainable = self.env.trainable_embedding;
        let loader    = Arc::clone(&self.train_loader);

        for batch in loader.iter() {
            self.step += 1;
            let start = Instant::now();

            let size = batch.len().max(1) as f64;
            let SentimentBatch { tokens, labels } = batch;

            // ── Forward ───────────────────────────────────────────────────────
            let features = self.embedding.forward(tokens);
            let logits   = self.model.forward(features);
            let loss     = self.loss.forward(logits.clone(), labels.clone());

            // ── Backward + Adam updates ───────────────────────────────────────
            let mut grads   = loss.backward();
            let model_grads = GradientsParams::from_module(&mut grads, &self.model);
            self.model      = self.model_optim.step(self.lr, self.model.clone(), model_grads);

            if trainable {
                let embed_grads = GradientsParams::from_module(&mut grads, &self.embedding);
                self.embedding  = self.embed_optim.step(self.lr, self.embedding.clone(), embed_grads);
            }

            let elapsed = start.elapsed().as_secs_f64();

            let loss_value = read_scalar(loss)?;
            let correct    = count_correct(logits, labels)?;

            self.info.update(evaluation::EPOCH, self.epoch as f64);
            self.info.update(evaluation::TIME_PER_STEP, elapsed);
            self.info.update(evaluation::TIME_PER_ITEM, elapsed / size);
            self.info.update(evaluation::LOSS, loss_value);
            self.info.update(evaluation::ACCURACY_TOP1, correct as f64 / size);

            tracing::debug!("step {} | loss={:.4}", self.step, loss_value);
        }

        self.epoch += 1;
        Ok(())
    }

    /// Evaluate on the test split (`test = true`) or the validation split.
    pub fn infer(&mut self, test: bool) -> Result<()> {
        self.info.reset();
        let loader = if test { Arc::clone(&self.test_loader) } else { Arc::clone(&self.val_loader) };

        // valid() → inner backend, dropout off, no autodiff graph
        let model     = self.model.valid();
        let embedding = self.embedding.valid();

        for batch in loader.iter() {
            let start = Instant::now();

            let size = batch.len().max(1) as f64;
            let SentimentBatch { tokens, labels } = batch;
            let logits  = model.forward(embedding.forward(tokens));
            let correct = count_correct(logits, labels)?;

            let elapsed = start.elapsed().as_secs_f64();

            self.info.update(evaluation::ACCURACY_TOP1, correct as f64 / size);
            self.info.update(evaluation::EPOCH, self.epoch as f64);
            self.info.update(evaluation::TIME_PER_STEP, elapsed);
            self.info.update(evaluation::TIME_PER_ITEM, elapsed / size);
        }

        Ok(())
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn embedding(&self) -> &WordEmbedding<B> {
        &self.embedding
    }

    /// Completed training epochs
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Optimiser steps taken so far
    pub fn step(&self) -> usize {
        self.step
    }

    /// Metrics of the most recent pass
    pub fn info(&self) -> &EvaluationMetrics {
        &self.info
    }
}

/// Number of rows whose arg-max logit equals the label
fn count_correct<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> Result<usize> {
    let [batch_size, _] = logits.dims();
    let predictions     = logits.argmax(1).reshape([batch_size]);

    let correct = predictions
        .equal(labels)
        .int()
        .sum()
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| anyhow!("Cannot read accuracy from device: {e:?}"))?;

    let correct = correct.first().copied().context("accuracy tensor is empty")?;
    Ok(correct.max(0) as usize)
}

fn read_scalar<B: Backend>(tensor: Tensor<B, 1>) -> Result<f64> {
    let values = tensor
        .into_data()
        .convert::<f64>()
        .to_vec::<f64>()
        .map_err(|e| anyhow!("Cannot read loss from device: {e:?}"))?;
    values.first().copied().context("loss tensor is empty")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{environment, fixtures};
    use crate::ml::model::{BagOfEmbeddings, BagOfEmbeddingsConfig};
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::TensorData;

    type TestBackend = Autodiff<NdArray>;

    fn args() -> TrainerArgs {
        TrainerArgs { lr: 0.01, momentum: 0.9, weight_decay: 0.0 }
    }

    fn trainer(
        env: Environment,
    ) -> Trainer<
        TestBackend,
        BagOfEmbeddings<TestBackend>,
        impl Optimizer<BagOfEmbeddings<TestBackend>, TestBackend>,
        impl Optimizer<WordEmbedding<TestBackend>, TestBackend>,
    > {
        let device = Default::default();
        let model  = BagOfEmbeddingsConfig::new(env.embedding_dim(), 8, env.num_classes)
            .init::<TestBackend>(&device);
        let adam   = args().adam();
        Trainer::new(Arc::new(env), model, adam.init(), adam.init(), args().lr, &device)
    }

    fn weights<B: Backend>(embedding: &WordEmbedding<B>) -> TensorData {
        embedding.embedding.weight.val().into_data()
    }

    #[test]
    fn test_train_records_one_entry_per_batch() {
        let dir = fixtures::sst_root();
        let env = environment::sst2(&fixtures::env_args(dir.path())).unwrap();
        let batches = env.train.num_batches();

        let mut t = trainer(env);
        t.train().unwrap();

        assert_eq!(t.epoch(), 1);
        assert_eq!(t.step(), batches);
        assert_eq!(t.info().get(evaluation::LOSS).unwrap().count, batches);
        assert_eq!(t.info().mean(evaluation::EPOCH), Some(0.0));

        let acc = t.info().mean(evaluation::ACCURACY_TOP1).unwrap();
        assert!((0.0..=1.0).contains(&acc));
        assert!(t.info().mean(evaluation::LOSS).unwrap().is_finite());
    }

    #[test]
    fn test_trainable_embedding_is_updated() {
        let dir = fixtures::sst_root();
        let env = environment::sst2_fasttext(&fixtures::env_args(dir.path())).unwrap();

        let mut t  = trainer(env);
        let before = weights(t.embedding());
        t.train().unwrap();
        assert_ne!(before, weights(t.embedding()));
    }

    #[test]
    fn test_frozen_embedding_is_not_updated() {
        let dir = fixtures::sst_root();
        let env = environment::sst2_glove(&fixtures::env_args(dir.path())).unwrap();

        let mut t  = trainer(env);
        let before = weights(t.embedding());
        let hidden = t.model().hidden.weight.val().into_data();
        t.train().unwrap();

        assert_eq!(before, weights(t.embedding()));
        assert_ne!(hidden, t.model().hidden.weight.val().into_data());
    }

    #[test]
    fn test_infer_leaves_parameters_alone() {
        let dir = fixtures::sst_root();
        let env = environment::sst2(&fixtures::env_args(dir.path())).unwrap();
        let test_batches = env.test.num_batches();

        let mut t = trainer(env);
        t.train().unwrap();

        let embed  = weights(t.embedding());
        let hidden = t.model().hidden.weight.val().into_data();

        t.infer(true).unwrap();
        assert_eq!(embed, weights(t.embedding()));
        assert_eq!(hidden, t.model().hidden.weight.val().into_data());

        // metrics were reset: only this pass is counted, without loss
        assert_eq!(t.info().get(evaluation::ACCURACY_TOP1).unwrap().count, test_batches);
        assert_eq!(t.info().get(evaluation::LOSS).unwrap().count, 0);
        assert_eq!(t.info().mean(evaluation::EPOCH), Some(1.0));

        t.infer(false).unwrap();
        assert_eq!(t.epoch(), 1);
    }

    #[test]
    fn test_train_metrics_cover_only_that_epoch() {
        let dir = fixtures::sst_root();
        let env = environment::sst2(&fixtures::env_args(dir.path())).unwrap();
        let train_batches = env.train.num_batches();

        let mut t = trainer(env);
        t.infer(true).unwrap();
        t.train().unwrap();
        t.train().unwrap();

        // neither the earlier infer() nor the first epoch carries over
        assert_eq!(t.info().get(evaluation::ACCURACY_TOP1).unwrap().count, train_batches);
        assert_eq!(t.info().get(evaluation::LOSS).unwrap().count, train_batches);
        assert_eq!(t.info().mean(evaluation::EPOCH), Some(1.0));
        assert_eq!(t.step(), 2 * train_batches);
    }

    #[test]
    fn test_count_correct() {
        let device = Default::default();
        let logits = Tensor::<NdArray, 2>::from_data(
            TensorData::new(vec![0.9f32, 0.1, 0.2, 0.8, 0.7, 0.3], [3, 2]),
            &device,
        );
        let labels = Tensor::<NdArray, 1, Int>::from_data(TensorData::new(vec![0i32, 1, 1], [3]), &device);
        assert_eq!(count_correct(logits, labels).unwrap(), 2);
    }
}
