// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records one row per training epoch to a CSV file so a run can
// be plotted or compared afterwards. The in-memory accumulator
// (ml::evaluation) is reset every pass; this file is the
// permanent record.
//
// Metrics recorded per epoch:
//   - epoch:         the epoch number (1, 2, 3, ...)
//   - train_loss:    mean cross-entropy over training steps
//   - train_acc:     mean top-1 accuracy over training steps
//   - val_acc:       mean top-1 accuracy on the validation split
//   - time_per_item: mean seconds per training example
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,train_acc,val_acc,time_per_item
//   1,0.684210,0.561000,0.602000,0.000041
//   2,0.612345,0.689000,0.711000,0.000039
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::ml::evaluation::{self, EvaluationMetrics};

const HEADER: &str = "epoch,train_loss,train_acc,val_acc,time_per_item";

/// One row of the CSV
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:         usize,
    pub train_loss:    f64,
    pub train_acc:     f64,
    pub val_acc:       f64,
    pub time_per_item: f64,
}

impl EpochMetrics {
    /// Combine the accumulator after `train()` with the one after
    /// `infer(false)`. Series with no updates read as 0.
    pub fn from_passes(epoch: usize, train: &EvaluationMetrics, val: &EvaluationMetrics) -> Self {
        Self {
            epoch,
            train_loss:    train.mean(evaluation::LOSS).unwrap_or_default(),
            train_acc:     train.mean(evaluation::ACCURACY_TOP1).unwrap_or_default(),
            val_acc:       val.mean(evaluation::ACCURACY_TOP1).unwrap_or_default(),
            time_per_item: train.mean(evaluation::TIME_PER_ITEM).unwrap_or_default(),
        }
    }

    /// True if validation accuracy beats `best_val_acc`
    pub fn is_improvement(&self, best_val_acc: f64) -> bool {
        self.val_acc > best_val_acc
    }
}

/// Appends epoch rows to `<dir>/metrics.csv`.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the header if the file doesn't exist yet, so repeated
    /// runs append to the same log.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.train_acc,
            m.val_acc,
            m.time_per_item,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_acc={:.4}",
            m.epoch,
            m.train_loss,
            m.val_acc,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::evaluation::TRAINER_METRICS;

    fn row(epoch: usize, val_acc: f64) -> EpochMetrics {
        EpochMetrics { epoch, train_loss: 0.5, train_acc: 0.75, val_acc, time_per_item: 0.001 }
    }

    #[test]
    fn test_is_improvement() {
        let m = row(2, 0.8);
        assert!(m.is_improvement(0.7));
        assert!(!m.is_improvement(0.8));
    }

    #[test]
    fn test_from_passes_reads_means() {
        let mut train = EvaluationMetrics::new(&TRAINER_METRICS);
        train.update(evaluation::LOSS, 0.6);
        train.update(evaluation::LOSS, 0.4);
        train.update(evaluation::ACCURACY_TOP1, 0.5);
        train.update(evaluation::TIME_PER_ITEM, 0.25);

        let mut val = EvaluationMetrics::new(&TRAINER_METRICS);
        val.update(evaluation::ACCURACY_TOP1, 1.0);

        let m = EpochMetrics::from_passes(4, &train, &val);
        assert_eq!(m.epoch, 4);
        assert!((m.train_loss - 0.5).abs() < 1e-12);
        assert_eq!(m.train_acc, 0.5);
        assert_eq!(m.val_acc, 1.0);
        assert_eq!(m.time_per_item, 0.25);
    }

    #[test]
    fn test_log_appends_rows_after_header() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&row(1, 0.6)).unwrap();

        // a second logger on the same directory keeps the existing rows
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&row(2, 0.7)).unwrap();

        let csv   = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,0.500000,0.750000,0.600000,0.001000");
        assert!(lines[2].starts_with("2,"));
    }
}
