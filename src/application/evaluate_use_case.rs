// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Measures a trained checkpoint on the held-out splits:
//
//   1. Load train_config.json                      (Layer 6)
//   2. Rebuild the same environment from it        (Layer 4)
//      same seed → same split, vocabulary, vectors
//   3. Rebuild the model and load the latest
//      model + embedding checkpoint                (Layer 6)
//   4. infer(false) on val, infer(true) on test    (Layer 5)
//
// Data paths and the device can be overridden, e.g. to evaluate
// a GPU-trained run on the CPU.

use anyhow::Result;
use burn::tensor::backend::AutodiffBackend;
use std::{path::PathBuf, sync::Arc};

use crate::data::environment::make_env;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    backend::{gpu_device, CpuBackend, DeviceKind, GpuBackend},
    embedding::WordEmbedding,
    evaluation,
    trainer::Trainer,
};

use super::train_use_case::TrainConfig;

/// Optional replacements for values stored in the saved config
#[derive(Debug, Clone, Default)]
pub struct EvaluateOverrides {
    pub data_root: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub device:    Option<DeviceKind>,
}

#[derive(Debug, Clone)]
pub struct EvaluateReport {
    pub epoch:         usize,
    pub val_accuracy:  f64,
    pub test_accuracy: f64,
}

pub struct EvaluateUseCase {
    checkpoint_dir: PathBuf,
    overrides:      EvaluateOverrides,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: impl Into<PathBuf>, overrides: EvaluateOverrides) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into(), overrides }
    }

    pub fn execute(&self) -> Result<EvaluateReport> {
        let ckpt = CheckpointManager::new(&self.checkpoint_dir)?;
        let cfg  = self.apply_overrides(ckpt.load_config()?);

        tracing::info!("Evaluating '{}' checkpoint on {}", cfg.env, cfg.device);
        match cfg.device {
            DeviceKind::Cpu => run::<CpuBackend>(&ckpt, &cfg, &Default::default()),
            DeviceKind::Gpu => run::<GpuBackend>(&ckpt, &cfg, &gpu_device()),
        }
    }

    fn apply_overrides(&self, mut cfg: TrainConfig) -> TrainConfig {
        if let Some(root) = &self.overrides.data_root {
            cfg.data_root = root.clone();
        }
        if let Some(cache) = &self.overrides.cache_dir {
            cfg.cache_dir = cache.clone();
        }
        if let Some(device) = self.overrides.device {
            cfg.device = device;
        }
        cfg
    }
}

fn run<B: AutodiffBackend>(
    ckpt:   &CheckpointManager,
    cfg:    &TrainConfig,
    device: &B::Device,
) -> Result<EvaluateReport> {
    let env = Arc::new(make_env(cfg.env, &cfg.env_args())?);

    let model     = cfg.model_config(env.embedding_dim(), env.num_classes).init::<B>(device);
    let embedding = WordEmbedding::<B>::from_table(&env.vectors, device);
    let (model, embedding, epoch) = ckpt.load_latest(model, embedding, device)?;

    let adam = cfg.trainer_args().adam();
    let mut trainer = Trainer::new(Arc::clone(&env), model, adam.init(), adam.init(), cfg.lr, device)
        .with_embedding(embedding)
        .with_epoch(epoch);

    trainer.infer(false)?;
    let val_accuracy = trainer.info().mean(evaluation::ACCURACY_TOP1).unwrap_or_default();
    tracing::info!("Validation: {}", trainer.info());

    trainer.infer(true)?;
    let test_accuracy = trainer.info().mean(evaluation::ACCURACY_TOP1).unwrap_or_default();
    tracing::info!("Test: {}", trainer.info());

    Ok(EvaluateReport { epoch, val_accuracy, test_accuracy })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainUseCase;
    use crate::data::{environment::EnvKind, fixtures};

    #[test]
    fn test_evaluates_latest_checkpoint() {
        let dir  = fixtures::sst_root();
        let args = fixtures::env_args(dir.path());
        let cfg  = TrainConfig {
            data_root:      args.data_root,
            cache_dir:      args.cache_dir,
            checkpoint_dir: dir.path().join("checkpoints"),
            env:            EnvKind::Sst2Glove,
            batch_size:     args.batch_size,
            split_ratio:    args.split_ratio,
            fix_length:     args.fix_length,
            epochs:         1,
            hidden_size:    8,
            seed:           args.seed,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let report = EvaluateUseCase::new(&cfg.checkpoint_dir, EvaluateOverrides::default())
            .execute()
            .unwrap();
        assert_eq!(report.epoch, 1);
        assert!((0.0..=1.0).contains(&report.val_accuracy));
        assert!((0.0..=1.0).contains(&report.test_accuracy));
    }

    #[test]
    fn test_missing_checkpoint_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = EvaluateUseCase::new(dir.path().join("none"), EvaluateOverrides::default());
        assert!(use_case.execute().is_err());
    }

    #[test]
    fn test_overrides_replace_saved_values() {
        let use_case = EvaluateUseCase::new(
            "checkpoints",
            EvaluateOverrides {
                data_root: Some(PathBuf::from("/elsewhere")),
                cache_dir: None,
                device:    Some(DeviceKind::Gpu),
            },
        );
        let cfg = use_case.apply_overrides(TrainConfig::default());
        assert_eq!(cfg.data_root, PathBuf::from("/elsewhere"));
        assert_eq!(cfg.cache_dir, TrainConfig::default().cache_dir);
        assert_eq!(cfg.device, DeviceKind::Gpu);
    }
}
