// ============================================================
// Layer 3: LabeledPassword Domain Type
// ============================================================
// One row of the training corpus: a candidate password and the
// strength category a human (or a rule-based checker) gave it.
//
// Example:
//   password: "kzde5577"
//   strength: StrengthLabel::Medium

use serde::{Deserialize, Serialize};

use crate::domain::strength::StrengthLabel;

/// A password annotated with its strength category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPassword {
    /// The raw password text, exactly as it appeared in the corpus
    pub password: String,

    /// The annotated strength category
    pub strength: StrengthLabel,
}

impl LabeledPassword {
    pub fn new(password: impl Into<String>, strength: StrengthLabel) -> Self {
        Self {
            password: password.into(),
            strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_password_verbatim() {
        let p = LabeledPassword::new(" pässwörd ", StrengthLabel::Medium);
        assert_eq!(p.password, " pässwörd ");
        assert_eq!(p.strength, StrengthLabel::Medium);
    }
}
