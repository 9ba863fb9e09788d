// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw treebank files to tensor batches.
//
// The pipeline flows in this order:
//
//   sst/trees/*.txt
//       │
//       ▼
//   SstTreeReader     → parses PTB trees into labelled sentences
//       │
//       ▼
//   Preprocessor      → lowercase, tokenize, lemmatize, drop stopwords
//       │
//       ▼
//   ExampleCache      → preprocessed.json (first run writes it)
//       │
//       ▼
//   SstCorpus         → neutral-free train / val / test splits
//       │
//       ▼
//   Vocabulary        → token indices + initial vector table
//       │
//       ▼
//   BatchIterator     → DataLoaderBuilder per split, one pass per epoch
//       │
//       ▼
//   SentimentBatcher  → fixed-length Int tensors on the target device
//
// Environment ties the pipeline together for the three named
// SST-2 variants.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Reads the SST PTB-tree files
pub mod corpus;

/// Sentence cleaning: tokenize, lemmatize, drop stopwords
pub mod preprocessor;

/// Penn tagger and WordNet-style lemmatizer
pub mod lemmatizer;

/// NLTK English stopword list
pub mod stopwords;

/// Burn Dataset over examples and the SST-2 split builder
pub mod dataset;

/// Seeded train/validation split
pub mod splitter;

/// Vocabulary, pretrained vector files and the vector table
pub mod vocab;

/// Fixed-length batches over one split
pub mod iterator;

/// Token batches → tensors
pub mod batcher;

/// The sst2 / sst2-glove / sst2-fasttext environments
pub mod environment;

#[cfg(test)]
pub mod fixtures;
