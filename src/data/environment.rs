// ============================================================
// Layer 4 — Environment Factory
// ============================================================
// An Environment bundles everything the trainer needs to know
// about the data:
//
//   size          (fix_length, embedding_dim) of one example
//   num_classes   2 (negative, positive)
//   train/val/test  batch iterators (each builds a DataLoader)
//   vectors       initial embedding table
//   trainable_embedding  whether the optimiser may touch it
//
// Three named variants share the same pipeline and differ only
// in the word vectors and iterator settings:
//
//   variant         vectors                          embedding   shuffle t/v/t
//   ─────────────   ──────────────────────────────   ─────────   ─────────────
//   sst2            GloVe shape, values re-drawn     trainable   on/on/on
//                   from N(0, 1)
//   sst2-glove      glove/glove.840B.300d.txt        frozen      on/on/on
//   sst2-fasttext   fasttext/wiki.en.vec             trainable   on/on/off
//
// Vector paths are relative to the data root. Nothing is
// downloaded; a missing file is an error.

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use crate::data::{
    dataset::{SentimentDataset, SstCorpus},
    iterator::BatchIterator,
    vocab::{VectorTable, Vocabulary},
};
use crate::domain::example::Sentiment;

pub const DEFAULT_FIX_LENGTH: usize = 32;

pub fn glove_path(root: &Path) -> PathBuf {
    root.join("glove").join("glove.840B.300d.txt")
}

pub fn fasttext_path(root: &Path) -> PathBuf {
    root.join("fasttext").join("wiki.en.vec")
}

// ─── EnvKind ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvKind {
    Sst2,
    Sst2Glove,
    Sst2Fasttext,
}

impl EnvKind {
    pub const ALL: [EnvKind; 3] = [EnvKind::Sst2, EnvKind::Sst2Glove, EnvKind::Sst2Fasttext];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sst2         => "sst2",
            Self::Sst2Glove    => "sst2-glove",
            Self::Sst2Fasttext => "sst2-fasttext",
        }
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnvKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.replace('_', "-").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown environment '{s}' (expected sst2, sst2-glove or sst2-fasttext)"))
    }
}

// ─── EnvArgs / Environment ────────────────────────────────────────────────────

/// Settings shared by every variant
#[derive(Debug, Clone)]
pub struct EnvArgs {
    pub data_root:   PathBuf,
    pub cache_dir:   PathBuf,
    pub batch_size:  usize,
    /// Share of train+dev kept for training, in [0, 1]
    pub split_ratio: f64,
    pub fix_length:  usize,
    pub seed:        u64,
}

pub struct Environment {
    pub kind:                EnvKind,
    /// (fix_length, embedding_dim)
    pub size:                (usize, usize),
    pub num_classes:         usize,
    pub train:               BatchIterator,
    pub val:                 BatchIterator,
    pub test:                BatchIterator,
    pub vocab:               Arc<Vocabulary>,
    pub vectors:             VectorTable,
    pub trainable_embedding: bool,
}

impl Environment {
    pub fn embedding_dim(&self) -> usize {
        self.size.1
    }
}

/// Build the environment for `kind`
pub fn make_env(kind: EnvKind, args: &EnvArgs) -> Result<Environment> {
    match kind {
        EnvKind::Sst2         => sst2(args),
        EnvKind::Sst2Glove    => sst2_glove(args),
        EnvKind::Sst2Fasttext => sst2_fasttext(args),
    }
}

/// GloVe-sized embedding with random N(0, 1) contents, trainable
pub fn sst2(args: &EnvArgs) -> Result<Environment> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let corpus  = SstCorpus::load(&args.data_root, &args.cache_dir, args.split_ratio, args.seed)?;
    let (vocab, vectors) = corpus.build_vocab(&glove_path(&args.data_root), &mut rng)?;
    let vectors = vectors.reinitialized(&mut rng);
    assemble(EnvKind::Sst2, args, corpus, vocab, vectors, true, [true, true, true])
}

/// Pretrained GloVe vectors, kept frozen
pub fn sst2_glove(args: &EnvArgs) -> Result<Environment> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let corpus  = SstCorpus::load(&args.data_root, &args.cache_dir, args.split_ratio, args.seed)?;
    let (vocab, vectors) = corpus.build_vocab(&glove_path(&args.data_root), &mut rng)?;
    assemble(EnvKind::Sst2Glove, args, corpus, vocab, vectors, false, [true, true, true])
}

/// Pretrained fastText vectors, fine-tuned; test order is fixed
pub fn sst2_fasttext(args: &EnvArgs) -> Result<Environment> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let corpus  = SstCorpus::load(&args.data_root, &args.cache_dir, args.split_ratio, args.seed)?;
    let (vocab, vectors) = corpus.build_vocab(&fasttext_path(&args.data_root), &mut rng)?;
    assemble(EnvKind::Sst2Fasttext, args, corpus, vocab, vectors, true, [true, true, false])
}

fn assemble(
    kind:      EnvKind,
    args:      &EnvArgs,
    corpus:    SstCorpus,
    vocab:     Vocabulary,
    vectors:   VectorTable,
    trainable: bool,
    shuffle:   [bool; 3],
) -> Result<Environment> {
    let vocab = Arc::new(vocab);

    let iterator = |split: &SentimentDataset, shuffle: bool, offset: u64| {
        BatchIterator::new(
            split,
            Arc::clone(&vocab),
            args.batch_size,
            args.fix_length,
            shuffle,
            args.seed.wrapping_add(offset),
        )
    };

    let train = iterator(&corpus.train, shuffle[0], 1)?;
    let val   = iterator(&corpus.val,   shuffle[1], 2)?;
    let test  = iterator(&corpus.test,  shuffle[2], 3)?;

    tracing::info!(
        "Environment '{}' ready: size=({}, {}), {} embedding",
        kind,
        args.fix_length,
        vectors.dim(),
        if trainable { "trainable" } else { "frozen" },
    );

    Ok(Environment {
        kind,
        size: (args.fix_length, vectors.dim()),
        num_classes: Sentiment::BINARY_CLASSES,
        train,
        val,
        test,
        vocab,
        vectors,
        trainable_embedding: trainable,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, vocab::PAD_INDEX};
    use crate::ml::embedding::WordEmbedding;
    use burn::backend::NdArray;

    #[test]
    fn test_env_kind_parsing() {
        assert_eq!("sst2".parse::<EnvKind>(), Ok(EnvKind::Sst2));
        assert_eq!("SST2_GLOVE".parse::<EnvKind>(), Ok(EnvKind::Sst2Glove));
        assert_eq!("sst2-fasttext".parse::<EnvKind>(), Ok(EnvKind::Sst2Fasttext));
        assert!("imdb".parse::<EnvKind>().is_err());

        for kind in EnvKind::ALL {
            assert_eq!(kind.to_string().parse::<EnvKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_variants_share_shape() {
        let dir  = fixtures::sst_root();
        let args = fixtures::env_args(dir.path());

        for kind in EnvKind::ALL {
            let env = make_env(kind, &args).unwrap();
            assert_eq!(env.kind, kind);
            assert_eq!(env.size, (args.fix_length, fixtures::VECTOR_DIM));
            assert_eq!(env.num_classes, 2);
            assert_eq!(env.vectors.rows(), env.vocab.len());
            assert_eq!(
                env.train.len() + env.val.len(),
                fixtures::TRAIN_POLAR + fixtures::DEV_POLAR
            );
            assert_eq!(env.test.len(), fixtures::TEST_POLAR);
        }
    }

    #[test]
    fn test_variant_policies() {
        let dir  = fixtures::sst_root();
        let args = fixtures::env_args(dir.path());

        let sst2 = sst2(&args).unwrap();
        assert!(sst2.trainable_embedding);
        assert!(sst2.train.shuffles() && sst2.val.shuffles() && sst2.test.shuffles());
        // every row is re-drawn, padding included
        assert!(sst2.vectors.row(PAD_INDEX).unwrap().iter().any(|&v| v != 0.0));

        let glove = sst2_glove(&args).unwrap();
        assert!(!glove.trainable_embedding);
        assert!(glove.test.shuffles());
        assert!(glove.vectors.row(PAD_INDEX).unwrap().iter().all(|&v| v == 0.0));

        let fasttext = sst2_fasttext(&args).unwrap();
        assert!(fasttext.trainable_embedding);
        assert!(fasttext.train.shuffles() && !fasttext.test.shuffles());
    }

    #[test]
    fn test_same_seed_same_environment() {
        let dir  = fixtures::sst_root();
        let args = fixtures::env_args(dir.path());

        let a = sst2_glove(&args).unwrap();
        let b = sst2_glove(&args).unwrap();
        assert_eq!(a.vocab, b.vocab);
        assert_eq!(a.vectors, b.vectors);

        let device = Default::default();
        let pass = |env: &Environment| -> Vec<Vec<i64>> {
            env.val
                .loader::<NdArray>(&device)
                .iter()
                .map(|b| b.tokens.into_data().convert::<i64>().to_vec().unwrap())
                .collect()
        };
        assert_eq!(pass(&a), pass(&b));
    }

    #[test]
    fn test_train_batches_embed_to_environment_size() {
        let dir  = fixtures::sst_root();
        let args = fixtures::env_args(dir.path());
        let env  = sst2(&args).unwrap();

        let device    = Default::default();
        let embedding = WordEmbedding::<NdArray>::from_table(&env.vectors, &device);
        let loader    = env.train.loader::<NdArray>(&device);

        let mut sizes = Vec::new();
        for batch in loader.iter() {
            let n = batch.len();
            let features = embedding.forward(batch.tokens);
            assert_eq!(features.dims(), [n, env.size.0, env.size.1]);
            assert_eq!(batch.labels.dims(), [n]);
            sizes.push(n);
        }

        // 10 training examples at batch size 4
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(env.size, (6, fixtures::VECTOR_DIM));
    }

    #[test]
    fn test_missing_vectors_is_an_error() {
        let dir  = fixtures::sst_root();
        let args = fixtures::env_args(dir.path());
        std::fs::remove_file(fasttext_path(dir.path())).unwrap();
        assert!(sst2_fasttext(&args).is_err());
    }
}
