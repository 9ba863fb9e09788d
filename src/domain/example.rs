// ============================================================
// Layer 3 — Example Domain Types
// ============================================================
// The Stanford Sentiment Treebank scores every sentence on a
// five point scale (0 = very negative … 4 = very positive).
// The binary task collapses that scale:
//
//   0, 1 → Negative
//   2    → Neutral   (dropped at load time)
//   3, 4 → Positive
//
// A RawSentence is what the corpus reader hands back.
// An Example is the same sentence after preprocessing —
// an ordered list of cleaned tokens plus its label.
//
// Reference: Socher et al. (2013) Recursive Deep Models for
//            Semantic Compositionality Over a Sentiment Treebank

use serde::{Deserialize, Serialize};

/// Sentence-level sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Number of classes left once neutral sentences are filtered out
    pub const BINARY_CLASSES: usize = 2;

    /// Map a 0..=4 treebank score onto the three coarse labels.
    /// Returns None for anything outside the scale.
    pub fn from_treebank_score(score: u8) -> Option<Self> {
        match score {
            0 | 1 => Some(Self::Negative),
            2     => Some(Self::Neutral),
            3 | 4 => Some(Self::Positive),
            _     => None,
        }
    }

    /// Class index used as the training target.
    /// Neutral has no index in the binary task.
    pub fn class_index(self) -> Option<usize> {
        match self {
            Self::Negative => Some(0),
            Self::Positive => Some(1),
            Self::Neutral  => None,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Self::Neutral
    }
}

/// One of the three files shipped with the treebank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreebankSplit {
    Train,
    Dev,
    Test,
}

impl TreebankSplit {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Train => "train.txt",
            Self::Dev   => "dev.txt",
            Self::Test  => "test.txt",
        }
    }
}

/// A sentence as read from disk, before any cleaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSentence {
    pub text:  String,
    pub label: Sentiment,
}

impl RawSentence {
    pub fn new(text: impl Into<String>, label: Sentiment) -> Self {
        Self { text: text.into(), label }
    }
}

/// A preprocessed (tokens, label) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub tokens: Vec<String>,
    pub label:  Sentiment,
}

impl Example {
    pub fn new(tokens: Vec<String>, label: Sentiment) -> Self {
        Self { tokens, label }
    }
}

/// The preprocessed corpus exactly as it is cached on disk.
/// `train` holds the treebank's train and dev sentences together;
/// the validation split is carved out of it later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessedCorpus {
    pub train: Vec<Example>,
    pub test:  Vec<Example>,
}

impl PreprocessedCorpus {
    /// Drop every neutral example from both lists
    pub fn without_neutral(mut self) -> Self {
        self.train.retain(|ex| !ex.label.is_neutral());
        self.test.retain(|ex| !ex.label.is_neutral());
        self
    }
}
