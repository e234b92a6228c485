// ============================================================
// Layer 3: Strength Categories
// ============================================================
// The three categories a password can be classified into, and
// the fixed lookup from the model's output vocabulary ids to
// those categories.
//
// The target vocabulary is built by sorting every token, so the
// four reserved tokens (*PAD*, *START*, *STOP*, *UNK*) always
// take ids 0..=3 and the corpus labels "0", "1", "2" land on
// 4, 5 and 6. A model retrained against the same target
// vocabulary must keep this mapping.
//
//   output id │ label
//   ──────────┼────────
//       4     │ WEAK
//       5     │ MEDIUM
//       6     │ STRONG
//     other   │ WEAK (fallback)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output id the model emits for a weak password.
pub const WEAK_OUTPUT_ID: u32 = 4;
/// Output id the model emits for a medium password.
pub const MEDIUM_OUTPUT_ID: u32 = 5;
/// Output id the model emits for a strong password.
pub const STRONG_OUTPUT_ID: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    pub const ALL: [StrengthLabel; 3] = [Self::Weak, Self::Medium, Self::Strong];

    /// Strict lookup: `None` for any id outside the three label ids.
    pub fn from_output_id(id: u32) -> Option<Self> {
        match id {
            WEAK_OUTPUT_ID => Some(Self::Weak),
            MEDIUM_OUTPUT_ID => Some(Self::Medium),
            STRONG_OUTPUT_ID => Some(Self::Strong),
            _ => None,
        }
    }

    pub fn output_id(self) -> u32 {
        match self {
            Self::Weak => WEAK_OUTPUT_ID,
            Self::Medium => MEDIUM_OUTPUT_ID,
            Self::Strong => STRONG_OUTPUT_ID,
        }
    }

    /// The token used for this label in the corpus and target vocabulary.
    pub fn token(self) -> &'static str {
        match self {
            Self::Weak => "0",
            Self::Medium => "1",
            Self::Strong => "2",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.token() == token)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "WEAK",
            Self::Medium => "MEDIUM",
            Self::Strong => "STRONG",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one password.
///
/// `recognized` is false when the decoded id was not one of the three
/// label ids and `label` holds the WEAK fallback. Callers that only need
/// the category can ignore it; it exists so a decoding anomaly can be told
/// apart from a genuine weak prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub label:      StrengthLabel,
    pub output_id:  u32,
    pub recognized: bool,
}

impl Prediction {
    pub fn from_output_id(output_id: u32) -> Self {
        let strict = StrengthLabel::from_output_id(output_id);
        Self {
            label: strict.unwrap_or(StrengthLabel::Weak),
            output_id,
            recognized: strict.is_some(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        !self.recognized
    }
}
