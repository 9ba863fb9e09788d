// ============================================================
// Layer 5 — Evaluation Metrics
// ============================================================
// In-memory accumulator for the per-step numbers the trainer
// records. Each named series keeps:
//
//   last   the most recent value
//   sum    running total since the last reset
//   count  number of updates since the last reset
//
// and reports mean = sum / count. The trainer resets the
// accumulator at the start of every pass, so after `train()`
// or `infer()` the means describe exactly that pass.

use std::fmt;

pub const EPOCH:         &str = "Epoch";
pub const TIME_PER_STEP: &str = "Time/Step";
pub const TIME_PER_ITEM: &str = "Time/Item";
pub const LOSS:          &str = "Loss";
pub const ACCURACY_TOP1: &str = "Accuracy/Top1";

/// The series every Trainer tracks, in display order
pub const TRAINER_METRICS: [&str; 5] = [EPOCH, TIME_PER_STEP, TIME_PER_ITEM, LOSS, ACCURACY_TOP1];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricSeries {
    pub last:  f64,
    pub sum:   f64,
    pub count: usize,
}

impl MetricSeries {
    fn update(&mut self, value: f64) {
        self.last   = value;
        self.sum   += value;
        self.count += 1;
    }

    /// Mean since the last reset, or None before the first update
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationMetrics {
    series: Vec<(String, MetricSeries)>,
}

impl EvaluationMetrics {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            series: names
                .iter()
                .map(|n| (n.as_ref().to_string(), MetricSeries::default()))
                .collect(),
        }
    }

    /// Record one value. A name not given to `new` starts a new series.
    pub fn update(&mut self, name: &str, value: f64) {
        match self.series.iter_mut().find(|(n, _)| n == name) {
            Some((_, series)) => series.update(value),
            None => {
                let mut series = MetricSeries::default();
                series.update(value);
                self.series.push((name.to_string(), series));
            }
        }
    }

    /// Zero every series, keeping the names
    pub fn reset(&mut self) {
        for (_, series) in &mut self.series {
            *series = MetricSeries::default();
        }
    }

    pub fn get(&self, name: &str) -> Option<&MetricSeries> {
        self.series.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn mean(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(MetricSeries::mean)
    }

    pub fn last(&self, name: &str) -> Option<f64> {
        self.get(name).filter(|s| s.count > 0).map(|s| s.last)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(n, _)| n.as_str())
    }
}

impl fmt::Display for EvaluationMetrics {
    /// `Epoch 2.0000 | Loss 0.6931 | ...` using the means
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .series
            .iter()
            .filter_map(|(name, s)| s.mean().map(|m| format!("{name} {m:.4}")))
            .collect();
        f.write_str(&parts.join(" | "))
    }
}
