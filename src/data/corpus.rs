// ============================================================
// Layer 4 — SST Tree Reader
// ============================================================
// Reads the Stanford Sentiment Treebank in its PTB-tree form.
// Every line of train.txt / dev.txt / test.txt is one fully
// labelled parse tree:
//
//   (3 (2 It) (4 (4 (2 's) (4 (3 (2 a) (4 (3 lot) ...)))) (2 .)))
//
// Only two things matter for sentence classification:
//   - the label right after the first "(" (the root score)
//   - the leaves, read left to right, which spell the sentence
//
// Every other node label is skipped without being parsed.
//
// Reference: Socher et al. (2013), trainDevTestTrees_PTB.zip
//            Rust Book §9 (Error Handling)

use anyhow::{bail, ensure, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::example::{RawSentence, Sentiment, TreebankSplit};
use crate::domain::traits::CorpusSource;

/// Sentences in train + dev + test of the official release
pub const SST_SENTENCES: u64 = 11_855;

/// Reads `train.txt`, `dev.txt` and `test.txt` from one directory.
/// Implements the CorpusSource trait from Layer 3.
pub struct SstTreeReader {
    dir: PathBuf,
}

impl SstTreeReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The standard layout: `<root>/sst/trees/`
    pub fn under_root(root: &Path) -> Self {
        Self::new(root.join("sst").join("trees"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CorpusSource for SstTreeReader {
    fn load_split(&self, split: TreebankSplit) -> Result<Vec<RawSentence>> {
        let path = self.dir.join(split.file_name());
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read treebank file '{}'", path.display()))?;

        let sentences = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                parse_tree(line)
                    .with_context(|| format!("Malformed tree at {}:{}", path.display(), i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Read {} sentences from {}", sentences.len(), path.display());
        Ok(sentences)
    }

    fn size_hint(&self) -> Option<u64> {
        Some(SST_SENTENCES)
    }
}

// ─── Tree parsing ─────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum TreeToken<'a> {
    Open,
    Close,
    Atom(&'a str),
}

/// Split a tree line into parentheses and bare atoms
fn lex(line: &str) -> Vec<TreeToken<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(TreeToken::Atom(&line[s..i]));
            }
            match c {
                '(' => tokens.push(TreeToken::Open),
                ')' => tokens.push(TreeToken::Close),
                _   => {}
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(TreeToken::Atom(&line[s..]));
    }

    tokens
}

/// Parse one PTB tree into its sentence text and root sentiment.
/// Leaves are joined with single spaces.
pub fn parse_tree(line: &str) -> Result<RawSentence> {
    let mut depth      = 0usize;
    let mut after_open = false;
    let mut root_score = None;
    let mut leaves     = Vec::new();

    for token in lex(line) {
        match token {
            TreeToken::Open => {
                depth     += 1;
                after_open = true;
            }
            TreeToken::Close => {
                depth = match depth.checked_sub(1) {
                    Some(d) => d,
                    None    => bail!("unbalanced ')'"),
                };
                after_open = false;
            }
            TreeToken::Atom(label) if after_open => {
                if root_score.is_none() {
                    let score: u8 = label
                        .parse()
                        .with_context(|| format!("root label '{label}' is not a score"))?;
                    root_score = Some(score);
                }
                after_open = false;
            }
            TreeToken::Atom(leaf) => leaves.push(leaf),
        }
    }

    ensure!(depth == 0, "unbalanced '('");

    let score = root_score.context("tree has no root label")?;
    let label = Sentiment::from_treebank_score(score)
        .with_context(|| format!("root score {score} is outside 0..=4"))?;

    Ok(RawSentence::new(leaves.join(" "), label))
}
