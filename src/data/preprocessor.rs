// ============================================================
// Layer 4: Corpus Preprocessor
// ============================================================
// Turns tokenised passwords and labels into fixed-width id rows.
//
// Two pure functions form the boundary the training and
// inference pipelines call:
//
//   pad_corpus     → right-pads every row to a fixed width
//   convert_to_id  → maps tokens to ids with a given vocabulary
//
// Row layout after padding (SOURCE_WINDOW = TARGET_WINDOW = 14):
//
//   source: p a s s w o r d 1 2 3 *STOP* *PAD* *PAD*          (14)
//   target: *START* 0 *STOP* *PAD* ... *PAD*                  (15)
//
// The target row is one position wider than the source row
// because the window builder later drops one column from each
// side of it (first column for labels, last for decoder input).
//
// Both functions must be applied identically at training time
// and at inference time, with the same vocabularies.

use crate::data::vocab::{Vocabulary, PAD_TOKEN, START_TOKEN, STOP_TOKEN};

/// Width of every padded source row.
pub const SOURCE_WINDOW: usize = 14;
/// Target rows are `TARGET_WINDOW + 1` wide once `*START*` is prepended.
pub const TARGET_WINDOW: usize = 14;

/// Split a password into one token per character.
pub fn split_chars(password: &str) -> Vec<String> {
    password.chars().map(String::from).collect()
}

/// Right-pad source and target rows to their fixed widths.
///
/// Over-long rows are truncated so the `*STOP*` marker always fits.
pub fn pad_corpus(
    sources: &[Vec<String>],
    targets: &[Vec<String>],
) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    let padded_sources = sources
        .iter()
        .map(|line| {
            let mut row: Vec<String> = line
                .iter()
                .take(SOURCE_WINDOW - 1)
                .cloned()
                .collect();
            row.push(STOP_TOKEN.to_string());
            row.resize(SOURCE_WINDOW, PAD_TOKEN.to_string());
            row
        })
        .collect();

    let padded_targets = targets
        .iter()
        .map(|line| {
            let mut row = vec![START_TOKEN.to_string()];
            row.extend(line.iter().take(TARGET_WINDOW - 1).cloned());
            row.push(STOP_TOKEN.to_string());
            row.resize(TARGET_WINDOW + 1, PAD_TOKEN.to_string());
            row
        })
        .collect();

    (padded_sources, padded_targets)
}

/// Map every token of every row to its id; unknown tokens become `*UNK*`.
pub fn convert_to_id(vocab: &Vocabulary, sentences: &[Vec<String>]) -> Vec<Vec<u32>> {
    sentences
        .iter()
        .map(|sentence| sentence.iter().map(|token| vocab.id_of(token)).collect())
        .collect()
}
