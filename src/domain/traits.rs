// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits instead
// of concrete loaders and models, so a CSV corpus can be swapped
// for another source, or the neural classifier for a stub in
// tests, without touching the workflow code.

use anyhow::Result;

use crate::domain::labeled_password::LabeledPassword;
use crate::domain::strength::Prediction;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled passwords.
///
/// Implementations:
///   - CsvCorpusLoader → reads a `password,strength` CSV file
pub trait CorpusSource {
    /// Load every usable row from this source.
    fn load_all(&self) -> Result<Vec<LabeledPassword>>;
}

// ─── PasswordClassifier ───────────────────────────────────────────────────────
/// Any component that can rate a single password.
///
/// Implementations:
///   - ClassifyUseCase → runs the trained seq2seq model
pub trait PasswordClassifier {
    /// Rate one password. Always yields one of the three labels;
    /// the prediction records whether the fallback was used.
    fn classify(&self, password: &str) -> Result<Prediction>;
}
