// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles the training examples and cuts them in two:
//   - Training set:   used to update the weights
//   - Validation set: scored after every epoch
//
// The treebank files are not ordered randomly, so the cut is
// taken after a Fisher-Yates shuffle. The RNG is passed in by
// the caller: with a fixed seed the same examples end up in
// the validation set every run, which `evaluate` relies on.
//
// `train_fraction` is the share kept for training. It must lie
// in [0, 1]; the split index is rounded to the nearest sample.
//
// Reference: rand crate documentation (SliceRandom)

use anyhow::{ensure, Result};
use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` with `rng` and split into (train, validation).
pub fn split_train_val<T, R: Rng>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> Result<(Vec<T>, Vec<T>)> {
    ensure!(
        (0.0..=1.0).contains(&train_fraction),
        "split ratio must lie in [0, 1], got {train_fraction}"
    );

    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let val      = samples.split_off(split_at.min(total));

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    Ok((samples, val))
}
