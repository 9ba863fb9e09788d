// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The Burn modules and the training loop.
//
// What's in this layer:
//
//   backend.rs     — cpu (NdArray) / gpu (Wgpu) selection
//
//   embedding.rs   — WordEmbedding: token indices → vectors,
//                    initialised from the environment's table
//
//   model.rs       — SentimentModel trait plus the
//                    BagOfEmbeddings baseline classifier
//
//   trainer.rs     — Trainer: train() epochs and infer() passes
//                    with Adam, cross-entropy and top-1 accuracy
//
//   evaluation.rs  — EvaluationMetrics accumulator
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Backend aliases and the --device switch
pub mod backend;

/// Model-owned embedding lookup
pub mod embedding;

/// Classifier contract and the baseline model
pub mod model;

/// Training and evaluation passes
pub mod trainer;

/// Named metric series with running means
pub mod evaluation;
