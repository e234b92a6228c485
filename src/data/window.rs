// ============================================================
// Layer 4: Teacher-Forcing Window Builder
// ============================================================
// From one batch of padded target rows, derive:
//
//   decoder_input = target[:, 0 .. L-1]   (drop last column)
//   loss_target   = target[:, 1 .. L]     (drop first column)
//   mask          = loss_target != pad_id
//
// Example (L = 6, pad = 0, *START* = 1, *STOP* = 2):
//
//   target        = [1, 5, 2, 0, 0, 0]
//   decoder_input = [1, 5, 2, 0, 0]
//   loss_target   = [5, 2, 0, 0, 0]
//   mask          = [T, T, F, F, F]
//
// At position t the decoder sees the ground-truth token t and is
// scored on predicting token t+1 (teacher forcing).
//
// Both windows are fresh buffers read from an immutable borrow
// of the batch; the batch itself is never modified.

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    decoder_input: Vec<Vec<u32>>,
    loss_target:   Vec<Vec<u32>>,
    mask:          Vec<Vec<bool>>,
}

impl Window {
    pub fn build(targets: &[Vec<u32>], pad_id: u32) -> Result<Self> {
        let Some(first) = targets.first() else {
            bail!("cannot build a window from an empty batch");
        };
        let len = first.len();
        if len < 2 {
            bail!("target rows need at least 2 positions, got {len}");
        }
        if let Some(i) = targets.iter().position(|r| r.len() != len) {
            bail!("target row {i} has width {} (expected {len})", targets[i].len());
        }

        let decoder_input: Vec<Vec<u32>> = targets
            .iter()
            .map(|row| row[..len - 1].to_vec())
            .collect();
        let loss_target: Vec<Vec<u32>> = targets
            .iter()
            .map(|row| row[1..].to_vec())
            .collect();
        let mask = loss_target
            .iter()
            .map(|row| row.iter().map(|&id| id != pad_id).collect())
            .collect();

        Ok(Self { decoder_input, loss_target, mask })
    }

    pub fn decoder_input(&self) -> &[Vec<u32>] { &self.decoder_input }

    pub fn loss_target(&self) -> &[Vec<u32>] { &self.loss_target }

    pub fn mask(&self) -> &[Vec<bool>] { &self.mask }

    pub fn rows(&self) -> usize { self.loss_target.len() }

    /// Positions per row in both windows (target width - 1).
    pub fn width(&self) -> usize {
        self.loss_target.first().map_or(0, Vec::len)
    }

    /// Number of non-padding loss positions across the batch.
    pub fn word_count(&self) -> usize {
        self.mask.iter().flatten().filter(|&&m| m).count()
    }
}
