// ============================================================
// Layer 4: Vocabulary
// ============================================================
// Maps tokens (single password characters on the source side,
// label tokens on the target side) to integer ids.
//
// Ids are assigned by sorted token order, after adding four
// reserved tokens. '*' sorts before digits and letters, so in a
// vocabulary of letters, digits and labels the reserved tokens
// occupy the lowest ids:
//
//   *PAD*   → 0
//   *START* → 1
//   *STOP*  → 2
//   *UNK*   → 3
//
// Punctuation such as '!' or '#' sorts before '*', so a source
// vocabulary containing it shifts the reserved ids up. Always ask
// the vocabulary for pad_id() instead of assuming 0.
//
// A Vocabulary is built once before training, persisted next to
// the model, and loaded read-only for inference. Nothing in the
// training or inference loops mutates it.

use anyhow::{bail, Result};
use std::collections::{BTreeMap, BTreeSet};

pub const PAD_TOKEN:   &str = "*PAD*";
pub const START_TOKEN: &str = "*START*";
pub const STOP_TOKEN:  &str = "*STOP*";
pub const UNK_TOKEN:   &str = "*UNK*";

const RESERVED_TOKENS: [&str; 4] = [PAD_TOKEN, START_TOKEN, STOP_TOKEN, UNK_TOKEN];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    token_to_id: BTreeMap<String, u32>,
    pad_id:      u32,
    unk_id:      u32,
}

impl Vocabulary {
    /// Build a vocabulary from already padded sentences.
    ///
    /// Every distinct token plus the reserved tokens is sorted and
    /// numbered from zero, so the same corpus always yields the same ids.
    pub fn build<S: AsRef<str>>(sentences: &[Vec<S>]) -> Self {
        let mut tokens: BTreeSet<String> =
            RESERVED_TOKENS.iter().map(|t| t.to_string()).collect();
        for sentence in sentences {
            for token in sentence {
                tokens.insert(token.as_ref().to_string());
            }
        }

        let map = tokens
            .into_iter()
            .enumerate()
            .map(|(id, token)| (token, id as u32))
            .collect();

        // Reserved tokens are always present and ids are unique by construction.
        Self::assemble(map)
    }

    /// Rebuild a vocabulary from a stored token → id map.
    pub fn from_map(map: BTreeMap<String, u32>) -> Result<Self> {
        for reserved in [PAD_TOKEN, UNK_TOKEN] {
            if !map.contains_key(reserved) {
                bail!("vocabulary is missing the reserved token '{reserved}'");
            }
        }

        let mut seen = BTreeSet::new();
        for (token, id) in &map {
            if !seen.insert(*id) {
                bail!("vocabulary assigns id {id} to more than one token (one is '{token}')");
            }
        }

        Ok(Self::assemble(map))
    }

    fn assemble(token_to_id: BTreeMap<String, u32>) -> Self {
        let pad_id = token_to_id[PAD_TOKEN];
        let unk_id = token_to_id[UNK_TOKEN];
        Self { token_to_id, pad_id, unk_id }
    }

    pub fn pad_id(&self) -> u32 { self.pad_id }

    pub fn unk_id(&self) -> u32 { self.unk_id }

    /// Exact lookup, `None` for tokens outside the vocabulary.
    pub fn get(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    /// Lookup used for id conversion: unknown tokens map to `*UNK*`.
    pub fn id_of(&self, token: &str) -> u32 {
        self.get(token).unwrap_or(self.unk_id)
    }

    pub fn as_map(&self) -> &BTreeMap<String, u32> {
        &self.token_to_id
    }

    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strength::StrengthLabel;

    fn sentences(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_reserved_tokens_take_lowest_ids() {
        let v = Vocabulary::build(&sentences(&[&["a", "b"], &["Z"]]));
        assert_eq!(v.get(PAD_TOKEN), Some(0));
        assert_eq!(v.get(START_TOKEN), Some(1));
        assert_eq!(v.get(STOP_TOKEN), Some(2));
        assert_eq!(v.get(UNK_TOKEN), Some(3));
        assert_eq!(v.pad_id(), 0);
        assert_eq!(v.len(), 7);
    }

    #[test]
    fn test_label_tokens_land_on_output_ids() {
        let labels = sentences(&[
            &[START_TOKEN, "2", STOP_TOKEN, PAD_TOKEN],
            &[START_TOKEN, "0", STOP_TOKEN, PAD_TOKEN],
            &[START_TOKEN, "1", STOP_TOKEN, PAD_TOKEN],
        ]);
        let v = Vocabulary::build(&labels);
        for label in StrengthLabel::ALL {
            assert_eq!(v.get(label.token()), Some(label.output_id()));
        }
    }

    #[test]
    fn test_unknown_tokens_map_to_unk() {
        let v = Vocabulary::build(&sentences(&[&["a"]]));
        assert_eq!(v.id_of("a"), 4);
        assert_eq!(v.id_of("never seen"), v.unk_id());
        assert_eq!(v.get("a"), Some(4));
        assert_eq!(v.get("never seen"), None);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Vocabulary::build(&sentences(&[&["x", "y", "z"]]));
        let b = Vocabulary::build(&sentences(&[&["z", "y"], &["x"]]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_map_requires_padding() {
        let mut map = BTreeMap::new();
        map.insert(UNK_TOKEN.to_string(), 0);
        assert!(Vocabulary::from_map(map).is_err());
    }

    #[test]
    fn test_from_map_rejects_duplicate_ids() {
        let mut map = BTreeMap::new();
        map.insert(PAD_TOKEN.to_string(), 0);
        map.insert(UNK_TOKEN.to_string(), 1);
        map.insert("a".to_string(), 1);
        assert!(Vocabulary::from_map(map).is_err());
    }

    #[test]
    fn test_from_map_keeps_ids() {
        let built = Vocabulary::build(&sentences(&[&["q", "r"]]));
        let rebuilt = Vocabulary::from_map(built.as_map().clone()).unwrap();
        assert_eq!(built, rebuilt);
    }
}
