// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the trained modules using Burn's
// CompactRecorder.
//
// What gets saved per checkpoint:
//   1. Model weights      (.mpk.gz) — the classifier
//   2. Embedding weights  (.mpk.gz) — the word vectors, which
//                                     move during training for
//                                     the trainable variants
//   3. latest_epoch.json            — which epoch was last saved
//   4. train_config.json            — the run configuration
//
// The config is what lets `evaluate` rebuild the exact same
// environment (seeded split, deterministic vocabulary) and the
// same model shape before loading weights into them.
//
// File naming convention:
//   checkpoints/
//     model_epoch_1.mpk.gz
//     embedding_epoch_1.mpk.gz
//     model_epoch_2.mpk.gz
//     embedding_epoch_2.mpk.gz
//     ...
//     latest_epoch.json
//     train_config.json
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::embedding::WordEmbedding;

const LATEST_EPOCH: &str = "latest_epoch.json";
const TRAIN_CONFIG: &str = "train_config.json";

/// Manages saving and loading of checkpoints in one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a manager rooted at `dir` (created if missing)
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save the model and the embedding for `epoch`, then move the
    /// latest-epoch pointer.
    pub fn save<B, M>(&self, model: &M, embedding: &WordEmbedding<B>, epoch: usize) -> Result<()>
    where
        B: Backend,
        M: Module<B>,
    {
        record(model.clone(), self.module_path("model", epoch))?;
        record(embedding.clone(), self.module_path("embedding", epoch))?;

        let latest = self.dir.join(LATEST_EPOCH);
        fs::write(&latest, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", latest.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the latest checkpoint into freshly built `model` and
    /// `embedding`. Returns the restored modules and their epoch.
    pub fn load_latest<B, M>(
        &self,
        model:     M,
        embedding: WordEmbedding<B>,
        device:    &B::Device,
    ) -> Result<(M, WordEmbedding<B>, usize)>
    where
        B: Backend,
        M: Module<B>,
    {
        let epoch = self.latest_epoch()?;
        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let model     = restore(model, self.module_path("model", epoch), device)?;
        let embedding = restore(embedding, self.module_path("embedding", epoch), device)?;
        Ok((model, embedding, epoch))
    }

    /// Write the run configuration as pretty JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(TRAIN_CONFIG);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(TRAIN_CONFIG);

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. \
                 Make sure you have run 'train' before 'evaluate'.",
                path.display()
            )
        })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }

    /// Epoch number stored in latest_epoch.json
    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_EPOCH);

        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{}'. Have you run 'train' first?", path.display()))?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }

    // Without extension: the recorder appends .mpk.gz
    fn module_path(&self, name: &str, epoch: usize) -> PathBuf {
        self.dir.join(format!("{name}_epoch_{epoch}"))
    }
}

fn record<B: Backend, M: Module<B>>(module: M, path: PathBuf) -> Result<()> {
    CompactRecorder::new()
        .record(module.into_record(), path.clone())
        .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))
}

fn restore<B: Backend, M: Module<B>>(module: M, path: PathBuf, device: &B::Device) -> Result<M> {
    let record = CompactRecorder::new()
        .load(path.clone(), device)
        .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;
    Ok(module.load_record(record))
}
