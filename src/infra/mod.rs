// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the disk on behalf of other layers:
//
//   checkpoint.rs     — Saving and loading trained weights
//                       Uses Burn's CompactRecorder for the
//                       model and the word embedding, and
//                       keeps TrainConfig as JSON so evaluate
//                       can rebuild the same run.
//
//   example_cache.rs  — Preprocessed example persistence
//                       Writes the cleaned train/test lists
//                       once and reads them back on later runs.
//
//   metrics.rs        — Training metrics logging
//                       Appends one CSV row per epoch (loss,
//                       accuracy, time per item).
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Preprocessed example cache
pub mod example_cache;

/// Training metrics CSV logger
pub mod metrics;
