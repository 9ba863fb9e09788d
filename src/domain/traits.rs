// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The data pipeline only talks to these traits, so a different
// corpus format or storage backend can be dropped in without
// touching the dataset builder.
//
//   SstTreeReader       implements CorpusSource
//   PreprocessedCorpus  implements Persistable (JSON on disk)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::path::Path;

use crate::domain::example::{RawSentence, TreebankSplit};

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the raw labelled sentences of a split.
pub trait CorpusSource {
    /// Load every sentence of `split`, in file order.
    fn load_split(&self, split: TreebankSplit) -> Result<Vec<RawSentence>>;

    /// Total number of sentences across all splits, if known up front.
    /// Only used to size the progress bar.
    fn size_hint(&self) -> Option<u64> {
        None
    }
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path
    fn load(path: &Path) -> Result<Self>;
}
