// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that describe what the
// system works with: labelled sentences and examples.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only data types and the traits other layers implement

// Sentences, examples and sentiment labels
pub mod example;

// Abstractions implemented by the data and infra layers
pub mod traits;
