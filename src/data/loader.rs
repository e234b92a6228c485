// ============================================================
// Layer 4: Corpus Loader
// ============================================================
// Reads a labelled password corpus from a CSV file of the form
//
//   password,strength
//   kzde5577,1
//   kino3434,1
//   visi7k1yr,1
//   megzy123,1
//   lamborghin1,1
//   AVYq1lDE4MgAZfNt,2
//
// Strength is 0 (weak), 1 (medium) or 2 (strong). Passwords may
// themselves contain commas, so the strength is always taken
// from the text after the LAST comma on the line.
//
// Bad rows are skipped with a warning rather than failing the
// whole load: real leaked-password corpora contain a handful of
// malformed lines.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::labeled_password::LabeledPassword;
use crate::domain::strength::StrengthLabel;
use crate::domain::traits::CorpusSource;

/// Loads labelled passwords from one CSV file.
/// Implements the CorpusSource trait from Layer 3.
pub struct CsvCorpusLoader {
    path: PathBuf,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_all(&self) -> Result<Vec<LabeledPassword>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;

        let (rows, skipped) = parse_rows(&text);
        if skipped > 0 {
            tracing::warn!(
                "Skipped {} malformed rows in '{}'",
                skipped,
                self.path.display()
            );
        }
        tracing::info!("Loaded {} labelled passwords", rows.len());
        Ok(rows)
    }
}

/// Parse CSV text into labelled passwords, returning the number of
/// rows that had to be skipped.
fn parse_rows(text: &str) -> (Vec<LabeledPassword>, usize) {
    let mut rows    = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let Some((password, strength)) = line.rsplit_once(',') else {
            tracing::debug!("line {}: no comma separator", line_no + 1);
            skipped += 1;
            continue;
        };

        // Optional header row
        if line_no == 0 && strength.trim() == "strength" {
            continue;
        }

        match StrengthLabel::from_token(strength.trim()) {
            Some(label) if !password.is_empty() => {
                rows.push(LabeledPassword::new(password, label));
            }
            _ => {
                tracing::debug!("line {}: unusable row '{}'", line_no + 1, line);
                skipped += 1;
            }
        }
    }

    (rows, skipped)
}
