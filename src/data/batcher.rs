// ============================================================
// Layer 4: Seq2Seq Batcher
// ============================================================
// Two jobs:
//
//   1. batch_ranges: decide which rows make up each batch.
//      Batches are contiguous slices stepping by exactly
//      batch_size; a final short batch is kept as-is:
//
//        n = 10, batch_size = 4  →  [0..4] [4..8] [8..10]
//
//   2. Seq2SeqBatcher: Burn's Batcher trait. Turns a Vec of
//      SequencePairs into teacher-forcing tensors:
//
//        source rows  [b × S]      → input.source        Int  [b, S]
//        decoder in   [b × (L-1)]  → input.decoder_input Int  [b, L-1]
//        loss target  [b × (L-1)]  → loss_target         Int  [b, L-1]
//        mask         [b × (L-1)]  → mask                Bool [b, L-1]
//
// Rows are already padded to a fixed width by the preprocessor,
// so stacking is a flatten + reshape.
//
// The batcher yields a Result: an empty or ragged batch is an
// error for the caller, never a panic inside the data pipeline.

use anyhow::{bail, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};
use std::{marker::PhantomData, ops::Range};

use crate::data::{dataset::SequencePair, window::Window};

/// Contiguous row ranges covering `0..n` in order.
pub fn batch_ranges(n: usize, batch_size: usize) -> Result<Vec<Range<usize>>> {
    if batch_size == 0 {
        bail!("batch_size must be at least 1");
    }
    Ok((0..n)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(n))
        .collect())
}

/// Stack equal-width id rows into an Int tensor of shape [rows, width].
pub fn id_tensor<B: Backend>(rows: &[Vec<u32>], device: &B::Device) -> Result<Tensor<B, 2, Int>> {
    let width = rows.first().map_or(0, Vec::len);
    if rows.is_empty() || width == 0 {
        bail!("cannot build a tensor from an empty batch");
    }
    if let Some(i) = rows.iter().position(|r| r.len() != width) {
        bail!("row {i} has width {} (expected {width})", rows[i].len());
    }

    // Burn's Int tensors are signed; vocabulary ids are far below i32::MAX.
    let flat: Vec<i32> = rows
        .iter()
        .flat_map(|r| r.iter().map(|&id| id as i32))
        .collect();

    Ok(Tensor::<B, 1, Int>::from_ints(flat.as_slice(), device).reshape([rows.len(), width]))
}

// ─── ModelInput ───────────────────────────────────────────────────────────────
/// The two inputs of a sequence model forward pass, by name.
#[derive(Debug, Clone)]
pub struct ModelInput<B: Backend> {
    /// Encoder input ids, shape [batch, source_len]
    pub source: Tensor<B, 2, Int>,

    /// Decoder input ids, shape [batch, positions]
    pub decoder_input: Tensor<B, 2, Int>,
}

// ─── Seq2SeqBatch ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct Seq2SeqBatch<B: Backend> {
    pub input: ModelInput<B>,

    /// Ids the model is scored against, shape [batch, L-1]
    pub loss_target: Tensor<B, 2, Int>,

    /// true where loss_target is not padding, shape [batch, L-1]
    pub mask: Tensor<B, 2, Bool>,

    /// Number of true entries in `mask`
    pub word_count: usize,
}

// ─── Seq2SeqBatcher ───────────────────────────────────────────────────────────
/// Holds the target vocabulary's padding id, which decides the loss mask.
#[derive(Clone, Debug)]
pub struct Seq2SeqBatcher<B: Backend> {
    pad_id:   u32,
    _backend: PhantomData<B>,
}

impl<B: Backend> Seq2SeqBatcher<B> {
    pub fn new(pad_id: u32) -> Self {
        Self { pad_id, _backend: PhantomData }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
impl<B: Backend> Batcher<B, SequencePair, Result<Seq2SeqBatch<B>>> for Seq2SeqBatcher<B> {
    fn batch(&self, items: Vec<SequencePair>, device: &B::Device) -> Result<Seq2SeqBatch<B>> {
        let (source, target): (Vec<Vec<u32>>, Vec<Vec<u32>>) = items
            .into_iter()
            .map(|pair| (pair.source, pair.target))
            .unzip();

        let window = Window::build(&target, self.pad_id)?;
        let mask_rows: Vec<Vec<u32>> = window
            .mask()
            .iter()
            .map(|row| row.iter().map(|&m| u32::from(m)).collect())
            .collect();

        Ok(Seq2SeqBatch {
            input: ModelInput {
                source:        id_tensor(&source, device)?,
                decoder_input: id_tensor(window.decoder_input(), device)?,
            },
            loss_target: id_tensor(window.loss_target(), device)?,
            mask:        id_tensor::<B>(&mask_rows, device)?.equal_elem(1),
            word_count:  window.word_count(),
        })
    }
}
