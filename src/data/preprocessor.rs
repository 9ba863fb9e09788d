// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Turns one raw treebank sentence into the ordered list of
// tokens the vocabulary is built from.
//
// Steps (applied in order):
//   1. Lowercase the whole sentence
//   2. Split with the BERT pre-tokenizer from `tokenizers`
//      (whitespace + punctuation), then glue apostrophe
//      clitics back together the way a Treebank tokenizer
//      would:  "didn ' t" → "did" "n't",  "it ' s" → "it" "'s"
//   3. Keep purely alphabetic tokens
//   4. Tag each token, map the tag to a coarse part of speech
//      and lemmatize
//   5. Drop English stopwords
//
// There is no error path. A sentence that is nothing but
// punctuation simply comes back as an empty list.
//
// Reference: Rust Book §8 (Strings in Rust)
//            tokenizers crate documentation (pre_tokenizers)

use std::collections::HashSet;

use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::data::lemmatizer::{Lemmatizer, PartOfSpeech, PosTagger};
use crate::data::stopwords;

/// Pieces that follow an apostrophe and belong to the previous word
const CLITICS: &[&str] = &["s", "t", "re", "ve", "ll", "d", "m"];

pub struct Preprocessor {
    pre_tokenizer: BertPreTokenizer,
    tagger:        PosTagger,
    lemmatizer:    Lemmatizer,
    stopwords:     HashSet<&'static str>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            pre_tokenizer: BertPreTokenizer,
            tagger:        PosTagger::new(),
            lemmatizer:    Lemmatizer::new(),
            stopwords:     stopwords::english(),
        }
    }

    /// Run the full cleaning pipeline on one sentence.
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        self.tokenize(&text.to_lowercase())
            .into_iter()
            .filter(|token| is_alphabetic(token))
            .map(|token| {
                let pos = PartOfSpeech::from_penn_tag(self.tagger.tag(&token));
                self.lemmatizer.lemmatize(&token, pos)
            })
            .filter(|lemma| !self.stopwords.contains(lemma.as_str()))
            .collect()
    }

    /// Split text into word and punctuation tokens with clitics rejoined.
    /// Case is left untouched.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut pretokenized = PreTokenizedString::from(text);

        if let Err(e) = self.pre_tokenizer.pre_tokenize(&mut pretokenized) {
            tracing::debug!("Pre-tokenizer rejected {:?}: {}", text, e);
            return Vec::new();
        }

        let pieces: Vec<&str> = pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(piece, _, _)| piece)
            .collect();

        rejoin_clitics(pieces)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge `word ' clitic` triples.
/// A "t" clitic takes the "n" with it: "don ' t" → "do" "n't".
fn rejoin_clitics(pieces: Vec<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter().peekable();

    while let Some(piece) = iter.next() {
        if piece == "'" && !out.is_empty() {
            if let Some(clitic) = iter.next_if(|next| CLITICS.contains(next)) {
                let takes_n = clitic == "t"
                    && matches!(out.last(), Some(prev) if prev.len() > 1 && prev.ends_with('n'));

                if takes_n {
                    if let Some(prev) = out.last_mut() {
                        prev.pop();
                    }
                    out.push("n't".to_string());
                } else {
                    out.push(format!("'{clitic}"));
                }
                continue;
            }
        }
        out.push(piece.to_string());
    }

    out
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}
