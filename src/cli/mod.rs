// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
//   1. `preprocess` — build the example cache
//   2. `train`      — train on an SST-2 environment
//   3. `evaluate`   — score the latest checkpoint
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PreprocessArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "sst-sentiment",
    version,
    about = "Train and evaluate binary sentiment classifiers on the Stanford Sentiment Treebank."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route the subcommand to its use case
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Preprocess(args) => run_preprocess(args),
            Commands::Train(args)      => run_train(args),
            Commands::Evaluate(args)   => run_evaluate(args),
        }
    }
}

fn run_preprocess(args: PreprocessArgs) -> Result<()> {
    use crate::application::preprocess_use_case::PreprocessUseCase;

    let report = PreprocessUseCase::new(args.data.data_root, args.data.cache_dir).execute()?;
    println!(
        "Cached {} train and {} test examples ({} positive, {} negative) at '{}'",
        report.train,
        report.test,
        report.positive,
        report.negative,
        report.cache_path.display()
    );
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training with data root '{}'", args.data.data_root.display());

    let report = TrainUseCase::new(args.into()).execute()?;
    if let Some(best) = report.best_epoch.and_then(|e| report.history.get(e - 1)) {
        println!("Best validation accuracy {:.4} at epoch {}", best.val_acc, best.epoch);
    }
    println!("Test accuracy: {:.4}", report.test_accuracy);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let report = EvaluateUseCase::new(args.checkpoint_dir.clone(), args.overrides()).execute()?;
    println!(
        "Epoch {} | val_acc={:.4} | test_acc={:.4}",
        report.epoch, report.val_accuracy, report.test_accuracy
    );
    Ok(())
}
