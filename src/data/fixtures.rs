// Test-only data: a miniature treebank and matching vector files
// laid out the way the real data root is.
//
//   <root>/sst/trees/{train,dev,test}.txt
//   <root>/glove/glove.840B.300d.txt
//   <root>/fasttext/wiki.en.vec

use std::{fs, path::{Path, PathBuf}};

use tempfile::TempDir;

use crate::data::environment::{fasttext_path, glove_path, EnvArgs};

pub const VECTOR_DIM: usize = 4;

const TRAIN: &[(u8, &str)] = &[
    (4, "a great and moving film"),
    (3, "charming , witty fun"),
    (4, "superb acting"),
    (3, "a delightful little comedy"),
    (4, "brilliant and great"),
    (0, "a dull , boring mess"),
    (1, "tedious and bland"),
    (0, "awful acting"),
    (1, "clumsy , lifeless film"),
    (0, "boring boring boring"),
    (2, "a film about a man"),
    (2, "it is a movie"),
];

const DEV: &[(u8, &str)] = &[
    (3, "witty and charming"),
    (1, "bland comedy"),
    (4, "moving acting"),
    (2, "the film runs long"),
];

const TEST: &[(u8, &str)] = &[
    (4, "great fun"),
    (0, "a snoozefest"),
    (1, "dull film"),
    (3, "superb comedy"),
    (2, "a movie"),
];

pub const TRAIN_POLAR: usize = 10;
pub const DEV_POLAR:   usize = 3;
pub const TEST_POLAR:  usize = 4;

/// "(4 (2 a) (2 great) (2 film))"
fn tree(score: u8, sentence: &str) -> String {
    let leaves: Vec<String> = sentence
        .split_whitespace()
        .map(|w| format!("(2 {w})"))
        .collect();
    format!("({score} {})", leaves.join(" "))
}

fn write_split(dir: &Path, name: &str, rows: &[(u8, &str)]) {
    let text: Vec<String> = rows.iter().map(|&(s, t)| tree(s, t)).collect();
    fs::write(dir.join(name), text.join("\n") + "\n").unwrap();
}

fn vector_rows() -> String {
    ["great", "film", "boring", "dull", "witty", "comedy"]
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let row: Vec<String> = (0..VECTOR_DIM).map(|d| format!("{:.2}", (i + d) as f32 * 0.1)).collect();
            format!("{w} {}\n", row.join(" "))
        })
        .collect()
}

/// A temporary data root with the treebank and both vector files
pub fn sst_root() -> TempDir {
    let dir   = tempfile::tempdir().unwrap();
    let trees = dir.path().join("sst").join("trees");
    fs::create_dir_all(&trees).unwrap();

    write_split(&trees, "train.txt", TRAIN);
    write_split(&trees, "dev.txt", DEV);
    write_split(&trees, "test.txt", TEST);

    let glove = glove_file(dir.path());
    fs::create_dir_all(glove.parent().unwrap()).unwrap();
    fs::write(&glove, vector_rows()).unwrap();

    let fasttext = fasttext_path(dir.path());
    fs::create_dir_all(fasttext.parent().unwrap()).unwrap();
    fs::write(&fasttext, format!("6 {VECTOR_DIM}\n{}", vector_rows())).unwrap();

    dir
}

pub fn glove_file(root: &Path) -> PathBuf {
    glove_path(root)
}

pub fn env_args(root: &Path) -> EnvArgs {
    EnvArgs {
        data_root:   root.to_path_buf(),
        cache_dir:   root.join("cache"),
        batch_size:  4,
        split_ratio: 0.8,
        fix_length:  6,
        seed:        17,
    }
}
