// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal per use case (preprocess, train, evaluate).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No clap types here (that's Layer 1)
//   - No direct file formats (that's Layer 4 and 6)
//   - Only workflow coordination, plus the per-epoch summary
//     line a training run prints
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Building the preprocessed example cache
pub mod preprocess_use_case;

// The training workflow
pub mod train_use_case;

// Re-measuring a saved checkpoint
pub mod evaluate_use_case;
