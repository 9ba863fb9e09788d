// ============================================================
// Layer 4 — Vocabulary and Word Vectors
// ============================================================
// Three pieces:
//
//   Vocabulary         token ↔ index, built from training data
//   PretrainedVectors  rows read from a GloVe / fastText .txt
//                      file, filtered down to the vocabulary
//   VectorTable        dense [vocab_len, dim] matrix used to
//                      initialise the embedding layer
//
// Index layout of the vocabulary:
//
//   0        <unk>   every token not seen in training
//   1        <pad>   fills short sequences up to fix_length
//   2..      tokens by descending frequency, ties alphabetical
//
// The ordering makes the vocabulary (and so every token index)
// identical across runs, which lets `evaluate` rebuild exactly
// the embedding a checkpoint was trained against.
//
// Reference: Pennington et al. (2014) GloVe
//            Bojanowski et al. (2017) fastText .vec format

use anyhow::{Context, Result};
use rand::Rng;
use rand_distr::StandardNormal;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

pub const UNK_TOKEN: &str = "<unk>";
pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_INDEX: usize = 0;
pub const PAD_INDEX: usize = 1;

// ─── Vocabulary ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    itos: Vec<String>,
    stoi: HashMap<String, usize>,
}

impl Vocabulary {
    /// Count every token in `sequences` and lay them out after the
    /// two special entries.
    pub fn build<'a, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for seq in sequences {
            for token in seq {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts
            .into_iter()
            .filter(|(token, _)| *token != UNK_TOKEN && *token != PAD_TOKEN)
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let itos: Vec<String> = [UNK_TOKEN, PAD_TOKEN]
            .into_iter()
            .chain(ranked.into_iter().map(|(token, _)| token))
            .map(str::to_string)
            .collect();

        let stoi = itos
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();

        Self { itos, stoi }
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.stoi.contains_key(token)
    }

    /// Index of `token`, or `UNK_INDEX` when it was never seen
    pub fn index_of(&self, token: &str) -> usize {
        self.stoi.get(token).copied().unwrap_or(UNK_INDEX)
    }

    pub fn tokens(&self) -> &[String] {
        &self.itos
    }

    /// Convert tokens to indices, truncating or padding with
    /// `PAD_INDEX` so the result is exactly `fix_length` long.
    pub fn numericalize(&self, tokens: &[String], fix_length: usize) -> Vec<u32> {
        let mut ids: Vec<u32> = tokens
            .iter()
            .take(fix_length)
            .map(|t| self.index_of(t) as u32)
            .collect();
        ids.resize(fix_length, PAD_INDEX as u32);
        ids
    }
}

// ─── PretrainedVectors ────────────────────────────────────────────────────────

/// Word vectors read from disk, restricted to one vocabulary.
#[derive(Debug, Clone)]
pub struct PretrainedVectors {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl PretrainedVectors {
    /// Read a whitespace-separated vector file, keeping only rows whose
    /// token is in `vocab`.
    ///
    /// - a leading `count dim` header line (fastText) is skipped
    /// - the first data row fixes the dimension
    /// - rows with the wrong width, bad floats or invalid UTF-8 are skipped
    /// - the first occurrence of a token wins
    pub fn load(path: &Path, vocab: &Vocabulary) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open vector file '{}'", path.display()))?;
        let reader = BufReader::new(file);

        let mut dim: Option<usize> = None;
        let mut vectors            = HashMap::new();
        let mut skipped            = 0usize;

        for (line_no, raw) in reader.split(b'\n').enumerate() {
            let raw = raw.with_context(|| format!("Cannot read '{}'", path.display()))?;

            let Ok(line) = std::str::from_utf8(&raw) else {
                skipped += 1;
                continue;
            };
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(' ').collect();

            if line_no == 0 && is_header(&fields) {
                dim = fields[1].parse().ok();
                continue;
            }

            let width = match dim {
                Some(d) => d,
                None if fields.len() >= 2 => fields.len() - 1,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            dim = Some(width);

            if fields.len() != width + 1 {
                skipped += 1;
                continue;
            }

            let token = fields[0];
            if !vocab.contains(token) || vectors.contains_key(token) {
                continue;
            }

            match fields[1..].iter().map(|f| f.parse::<f32>()).collect::<Result<Vec<_>, _>>() {
                Ok(values) => {
                    vectors.insert(token.to_string(), values);
                }
                Err(_) => skipped += 1,
            }
        }

        let dim = dim.with_context(|| format!("Vector file '{}' has no rows", path.display()))?;

        if skipped > 0 {
            tracing::debug!("Skipped {} malformed rows in {}", skipped, path.display());
        }
        tracing::info!(
            "Loaded {} / {} vocabulary vectors (dim {}) from {}",
            vectors.len(),
            vocab.len(),
            dim,
            path.display()
        );

        Ok(Self { dim, vectors })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }
}

/// `2519370 300`
fn is_header(fields: &[&str]) -> bool {
    fields.len() == 2 && fields.iter().all(|f| f.parse::<usize>().is_ok())
}

// ─── VectorTable ──────────────────────────────────────────────────────────────

/// Row-major `[rows, dim]` matrix, one row per vocabulary index.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorTable {
    rows: usize,
    dim:  usize,
    data: Vec<f32>,
}

impl VectorTable {
    /// Look every vocabulary token up in `pretrained`.
    /// Misses get a standard normal row, `<pad>` gets zeros.
    pub fn from_pretrained<R: Rng>(vocab: &Vocabulary, pretrained: &PretrainedVectors, rng: &mut R) -> Self {
        let dim      = pretrained.dim();
        let mut data = Vec::with_capacity(vocab.len() * dim);

        for (index, token) in vocab.tokens().iter().enumerate() {
            if index == PAD_INDEX {
                data.extend(std::iter::repeat(0.0).take(dim));
            } else if let Some(row) = pretrained.get(token) {
                data.extend_from_slice(row);
            } else {
                data.extend((0..dim).map(|_| rng.sample::<f32, _>(StandardNormal)));
            }
        }

        Self { rows: vocab.len(), dim, data }
    }

    /// Every entry drawn from N(0, 1), `<pad>` included
    pub fn random<R: Rng>(rows: usize, dim: usize, rng: &mut R) -> Self {
        let data = (0..rows * dim)
            .map(|_| rng.sample::<f32, _>(StandardNormal))
            .collect();
        Self { rows, dim, data }
    }

    /// Same shape, fresh N(0, 1) contents
    pub fn reinitialized<R: Rng>(&self, rng: &mut R) -> Self {
        Self::random(self.rows, self.dim, rng)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        (index < self.rows).then(|| &self.data[index * self.dim..(index + 1) * self.dim])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::fs;

    fn seqs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|s| s.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    fn vocab_of(raw: &[&[&str]]) -> Vocabulary {
        let s = seqs(raw);
        Vocabulary::build(s.iter().map(Vec::as_slice))
    }

    #[test]
    fn test_vocab_order_is_frequency_then_alphabetical() {
        let vocab = vocab_of(&[&["film", "dull", "film"], &["bad", "dull", "film", "zany"]]);
        assert_eq!(vocab.tokens(), &["<unk>", "<pad>", "film", "dull", "bad", "zany"]);
        assert_eq!(vocab.index_of("film"), 2);
        assert_eq!(vocab.index_of("never-seen"), UNK_INDEX);
    }

    #[test]
    fn test_numericalize_pads_and_truncates() {
        let vocab  = vocab_of(&[&["a", "b", "c"]]);
        let tokens = seqs(&[&["a", "zzz"]]).remove(0);
        assert_eq!(vocab.numericalize(&tokens, 4), vec![2, 0, 1, 1]);

        let long = seqs(&[&["a", "b", "c", "a"]]).remove(0);
        assert_eq!(vocab.numericalize(&long, 2), vec![2, 3]);
    }

    #[test]
    fn test_pretrained_skips_header_and_bad_rows() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("wiki.en.vec");
        fs::write(
            &path,
            "4 3\nfilm 0.1 0.2 0.3 \nbroken 1.0\ndull x 0.0 0.0\nother 1 1 1\nfilm 9 9 9\n",
        )
        .unwrap();

        let vocab = vocab_of(&[&["film", "dull", "broken"]]);
        let vecs  = PretrainedVectors::load(&path, &vocab).unwrap();

        assert_eq!(vecs.dim(), 3);
        assert_eq!(vecs.len(), 1);
        assert_eq!(vecs.get("film"), Some(&[0.1, 0.2, 0.3][..]));
        assert!(vecs.get("other").is_none());
    }

    #[test]
    fn test_pretrained_first_row_sets_dim_without_header() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("glove.txt");
        fs::write(&path, "film 1 2\ndull 3 4 5\n").unwrap();

        let vocab = vocab_of(&[&["film", "dull"]]);
        let vecs  = PretrainedVectors::load(&path, &vocab).unwrap();
        assert_eq!(vecs.dim(), 2);
        assert!(vecs.get("dull").is_none());
    }

    #[test]
    fn test_pretrained_missing_or_empty_file_errors() {
        let dir   = tempfile::tempdir().unwrap();
        let vocab = vocab_of(&[&["film"]]);
        assert!(PretrainedVectors::load(&dir.path().join("nope.txt"), &vocab).is_err());

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "").unwrap();
        assert!(PretrainedVectors::load(&empty, &vocab).is_err());
    }

    #[test]
    fn test_table_rows_follow_vocab() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("glove.txt");
        fs::write(&path, "film 1 2\n").unwrap();

        let vocab = vocab_of(&[&["film", "dull", "dull"]]);
        let vecs  = PretrainedVectors::load(&path, &vocab).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let table = VectorTable::from_pretrained(&vocab, &vecs, &mut rng);

        assert_eq!(table.rows(), vocab.len());
        assert_eq!(table.dim(), 2);
        assert_eq!(table.row(PAD_INDEX), Some(&[0.0, 0.0][..]));
        assert_eq!(table.row(vocab.index_of("film")), Some(&[1.0, 2.0][..]));
        assert!(table.row(vocab.len()).is_none());

        let fresh = table.reinitialized(&mut rng);
        assert_eq!((fresh.rows(), fresh.dim()), (table.rows(), table.dim()));
        assert_ne!(fresh, table);
    }
}
