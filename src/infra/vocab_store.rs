// ============================================================
// Layer 6: Vocabulary Store
// ============================================================
// Persists the two vocabularies next to the model weights so
// inference uses exactly the ids the model was trained on.
//
//   checkpoints/
//     source_vocab.json   ← password characters → id
//     target_vocab.json   ← label tokens → id
//
// Each file is a flat JSON object {"token": id, ...}.
//
// The target vocabulary is checked on load: the three label
// tokens must map to the fixed output ids (4, 5, 6) that the
// inference lookup relies on. A mismatch is a configuration
// error, not something to paper over at classification time.

use anyhow::{bail, Context, Result};
use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::data::vocab::Vocabulary;
use crate::domain::strength::StrengthLabel;

const SOURCE_VOCAB_FILE: &str = "source_vocab.json";
const TARGET_VOCAB_FILE: &str = "target_vocab.json";

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save(&self, source: &Vocabulary, target: &Vocabulary) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        self.write(SOURCE_VOCAB_FILE, source)?;
        self.write(TARGET_VOCAB_FILE, target)?;
        tracing::info!(
            "Saved vocabularies ({} source, {} target tokens) to '{}'",
            source.len(),
            target.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load (source, target) vocabularies.
    pub fn load(&self) -> Result<(Vocabulary, Vocabulary)> {
        let source = self.read(SOURCE_VOCAB_FILE)?;
        let target = self.read(TARGET_VOCAB_FILE)?;
        check_label_ids(&target)?;
        Ok((source, target))
    }

    fn write(&self, name: &str, vocab: &Vocabulary) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(vocab.as_map())?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write vocabulary '{}'", path.display()))
    }

    fn read(&self, name: &str) -> Result<Vocabulary> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read vocabulary '{}'. Have you run training first?",
                path.display()
            )
        })?;
        let map: BTreeMap<String, u32> = serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a token → id map", path.display()))?;
        Vocabulary::from_map(map)
            .with_context(|| format!("Invalid vocabulary '{}'", path.display()))
    }
}

/// Every strength label token must map to its fixed model output id.
pub fn check_label_ids(target: &Vocabulary) -> Result<()> {
    for label in StrengthLabel::ALL {
        match target.get(label.token()) {
            Some(id) if id == label.output_id() => {}
            Some(id) => bail!(
                "target vocabulary maps {} ('{}') to id {id}, expected {}",
                label,
                label.token(),
                label.output_id()
            ),
            None => bail!(
                "target vocabulary has no entry for {} ('{}')",
                label,
                label.token()
            ),
        }
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::{pad_corpus, split_chars};

    fn vocabularies() -> (Vocabulary, Vocabulary) {
        let sources = vec![split_chars("abc"), split_chars("x!9")];
        let labels  = vec![vec!["0".to_string()], vec!["1".to_string()], vec!["2".to_string()]];
        let (sources, labels) = pad_corpus(&sources, &labels);
        (Vocabulary::build(&sources), Vocabulary::build(&labels))
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabStore::new(dir.path());
        let (source, target) = vocabularies();

        store.save(&source, &target).unwrap();
        let (loaded_source, loaded_target) = store.load().unwrap();
        assert_eq!(loaded_source, source);
        assert_eq!(loaded_target, target);
    }

    #[test]
    fn test_missing_files_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VocabStore::new(dir.path()).load().is_err());
    }

    #[test]
    fn test_rejects_target_without_label_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabStore::new(dir.path());
        let (source, _) = vocabularies();
        // Using the source vocabulary as a target: no "0"/"1"/"2" at 4/5/6.
        store.save(&source, &source).unwrap();
        assert!(store.load().is_err());
    }
}
