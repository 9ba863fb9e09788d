// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Build the environment      (Layer 4 - data)
//             cache → splits → vocab → iterators
//   Step 2: Save config                (Layer 6 - infra)
//   Step 3: Build model + trainer      (Layer 5 - ml)
//   Step 4: For each epoch:
//             train()                  (Layer 5 - ml)
//             infer(false) on val      (Layer 5 - ml)
//             metrics.csv row          (Layer 6 - infra)
//             checkpoint               (Layer 6 - infra)
//   Step 5: infer(true) on test        (Layer 5 - ml)
//
// The run is generic over the autodiff backend; `execute`
// picks NdArray or Wgpu from the configured device.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::tensor::backend::AutodiffBackend;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};

use crate::data::environment::{make_env, EnvArgs, EnvKind, DEFAULT_FIX_LENGTH};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    backend::{gpu_device, CpuBackend, DeviceKind, GpuBackend},
    evaluation,
    model::BagOfEmbeddingsConfig,
    trainer::{Trainer, TrainerArgs},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run needs. Saved next to the checkpoints so that
// `evaluate` can rebuild the same environment and model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_root:      PathBuf,
    pub cache_dir:      PathBuf,
    pub checkpoint_dir: PathBuf,
    pub env:            EnvKind,
    pub batch_size:     usize,
    pub split_ratio:    f64,
    pub fix_length:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub momentum:       f64,
    pub weight_decay:   f64,
    pub hidden_size:    usize,
    pub dropout:        f64,
    pub device:         DeviceKind,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_root:      PathBuf::from("data"),
            cache_dir:      PathBuf::from("data/cache"),
            checkpoint_dir: PathBuf::from("checkpoints"),
            env:            EnvKind::Sst2,
            batch_size:     64,
            split_ratio:    0.9,
            fix_length:     DEFAULT_FIX_LENGTH,
            epochs:         10,
            lr:             1e-3,
            momentum:       0.9,
            weight_decay:   0.0,
            hidden_size:    128,
            dropout:        0.1,
            device:         DeviceKind::Cpu,
            seed:           42,
        }
    }
}

impl TrainConfig {
    pub fn env_args(&self) -> EnvArgs {
        EnvArgs {
            data_root:   self.data_root.clone(),
            cache_dir:   self.cache_dir.clone(),
            batch_size:  self.batch_size,
            split_ratio: self.split_ratio,
            fix_length:  self.fix_length,
            seed:        self.seed,
        }
    }

    pub fn trainer_args(&self) -> TrainerArgs {
        TrainerArgs {
            lr:           self.lr,
            momentum:     self.momentum,
            weight_decay: self.weight_decay,
        }
    }

    pub fn model_config(&self, embedding_dim: usize, num_classes: usize) -> BagOfEmbeddingsConfig {
        BagOfEmbeddingsConfig::new(embedding_dim, self.hidden_size, num_classes).with_dropout(self.dropout)
    }
}

/// What a finished run reports back to the CLI
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub history:       Vec<EpochMetrics>,
    pub best_epoch:    Option<usize>,
    pub test_accuracy: f64,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the training run on the configured device
    pub fn execute(&self) -> Result<TrainReport> {
        tracing::info!("Training '{}' on {}", self.config.env, self.config.device);
        match self.config.device {
            DeviceKind::Cpu => self.run::<CpuBackend>(&Default::default()),
            DeviceKind::Gpu => self.run::<GpuBackend>(&gpu_device()),
        }
    }

    fn run<B: AutodiffBackend>(&self, device: &B::Device) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Environment ───────────────────────────────────────────────
        let env = Arc::new(make_env(cfg.env, &cfg.env_args())?);
        tracing::info!(
            "Batches per epoch: {} train, {} val, {} test",
            env.train.num_batches(),
            env.val.num_batches(),
            env.test.num_batches()
        );

        // ── Step 2: Save config for evaluate ──────────────────────────────────
        let ckpt   = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt.save_config(cfg)?;
        let logger = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 3: Model + trainer ───────────────────────────────────────────
        let model = cfg
            .model_config(env.embedding_dim(), env.num_classes)
            .init::<B>(device);
        let adam  = cfg.trainer_args().adam();
        let mut trainer = Trainer::new(Arc::clone(&env), model, adam.init(), adam.init(), cfg.lr, device);

        // ── Step 4: Epoch loop ────────────────────────────────────────────────
        let mut history    = Vec::with_capacity(cfg.epochs);
        let mut best_epoch = None;
        let mut best_val   = f64::NEG_INFINITY;

        for _ in 0..cfg.epochs {
            trainer.train()?;
            let train_info = trainer.info().clone();

            trainer.infer(false)?;
            let row = EpochMetrics::from_passes(trainer.epoch(), &train_info, trainer.info());

            println!(
                "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.4} | val_acc={:.4}",
                row.epoch, cfg.epochs, row.train_loss, row.train_acc, row.val_acc,
            );

            logger.log(&row)?;
            ckpt.save(trainer.model(), trainer.embedding(), row.epoch)?;

            if row.is_improvement(best_val) {
                best_val   = row.val_acc;
                best_epoch = Some(row.epoch);
            }
            history.push(row);
        }

        // ── Step 5: Test accuracy ─────────────────────────────────────────────
        trainer.infer(true)?;
        let test_accuracy = trainer.info().mean(evaluation::ACCURACY_TOP1).unwrap_or_default();
        tracing::info!("Test: {}", trainer.info());

        Ok(TrainReport { history, best_epoch, test_accuracy })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn config(root: &std::path::Path, env: EnvKind) -> TrainConfig {
        let args = fixtures::env_args(root);
        TrainConfig {
            data_root:      args.data_root,
            cache_dir:      args.cache_dir,
            checkpoint_dir: root.join("checkpoints"),
            env,
            batch_size:     args.batch_size,
            split_ratio:    args.split_ratio,
            fix_length:     args.fix_length,
            epochs:         2,
            hidden_size:    8,
            seed:           args.seed,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_run_writes_checkpoints_and_metrics() {
        let dir = fixtures::sst_root();
        let cfg = config(dir.path(), EnvKind::Sst2Fasttext);

        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.history[1].epoch, 2);
        assert!(report.best_epoch.is_some());
        assert!((0.0..=1.0).contains(&report.test_accuracy));

        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir).unwrap();
        assert_eq!(ckpt.latest_epoch().unwrap(), 2);
        assert_eq!(ckpt.load_config().unwrap().env, EnvKind::Sst2Fasttext);

        let csv = std::fs::read_to_string(cfg.checkpoint_dir.join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_env_args_follow_config() {
        let cfg  = TrainConfig { batch_size: 7, split_ratio: 0.5, ..TrainConfig::default() };
        let args = cfg.env_args();
        assert_eq!(args.batch_size, 7);
        assert_eq!(args.split_ratio, 0.5);
        assert_eq!(args.fix_length, DEFAULT_FIX_LENGTH);
    }
}
