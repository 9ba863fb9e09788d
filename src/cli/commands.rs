// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and all their flags:
//
//   preprocess  — build the example cache only
//   train       — train on one SST-2 environment
//   evaluate    — re-measure the latest checkpoint
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{evaluate_use_case::EvaluateOverrides, train_use_case::TrainConfig};
use crate::data::environment::{EnvKind, DEFAULT_FIX_LENGTH};
use crate::ml::backend::DeviceKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Preprocess the treebank into the example cache
    Preprocess(PreprocessArgs),

    /// Train a sentiment classifier
    Train(TrainArgs),

    /// Evaluate the latest checkpoint on validation and test
    Evaluate(EvaluateArgs),
}

/// Where the raw data and the example cache live
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Root holding sst/trees/, glove/ and fasttext/
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    /// Directory for the preprocessed example cache
    #[arg(long, default_value = "data/cache")]
    pub cache_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct PreprocessArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Directory to save checkpoints, config and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Environment variant: sst2, sst2-glove or sst2-fasttext
    #[arg(long, default_value = "sst2")]
    pub env: EnvKind,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Share of train+dev used for training; the rest is validation
    #[arg(long, default_value_t = 0.9, value_parser = parse_ratio)]
    pub split_ratio: f64,

    /// Tokens per example after padding / truncation
    #[arg(long, default_value_t = DEFAULT_FIX_LENGTH)]
    pub fix_length: usize,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Adam beta_1
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    #[arg(long, default_value_t = 0.0)]
    pub weight_decay: f64,

    /// Hidden width of the baseline classifier
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// cpu (NdArray) or gpu (Wgpu)
    #[arg(long, default_value = "cpu")]
    pub device: DeviceKind,

    /// Seed for the split, the shuffles and random vectors
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_root:      a.data.data_root,
            cache_dir:      a.data.cache_dir,
            checkpoint_dir: a.checkpoint_dir,
            env:            a.env,
            batch_size:     a.batch_size,
            split_ratio:    a.split_ratio,
            fix_length:     a.fix_length,
            epochs:         a.epochs,
            lr:             a.lr,
            momentum:       a.momentum,
            weight_decay:   a.weight_decay,
            hidden_size:    a.hidden_size,
            dropout:        a.dropout,
            device:         a.device,
            seed:           a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory the `train` command wrote to
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Override the data root stored in train_config.json
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Override the cache directory stored in train_config.json
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Override the device stored in train_config.json
    #[arg(long)]
    pub device: Option<DeviceKind>,
}

impl EvaluateArgs {
    pub fn overrides(&self) -> EvaluateOverrides {
        EvaluateOverrides {
            data_root: self.data_root.clone(),
            cache_dir: self.cache_dir.clone(),
            device:    self.device,
        }
    }
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s.parse().map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("split ratio must lie in [0, 1], got {ratio}"))
    }
}
