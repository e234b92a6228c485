// ============================================================
// Layer 5: Inferencer
// ============================================================
// Classifies a single password with a trained, frozen model.
//
//   "password123"
//     → split_chars           [p, a, s, s, w, o, r, d, 1, 2, 3]
//     → pad_corpus            source (14) + empty target (15)
//     → convert_to_id         same vocabularies as training
//     → forward               logits [1, 15, target_vocab]
//     → argmax per position   take row 0, position 0
//     → 4 / 5 / 6             WEAK / MEDIUM / STRONG
//
// The decoder input is the full padded placeholder target
// (*START* *STOP* *PAD* ...). The decoder is causal, so position 0
// only ever sees *START*; the remaining positions are ignored.
//
// Any id outside 4..=6 is reported as WEAK. The prediction keeps
// recognized = false in that case and a warning is logged, so the
// fallback never hides a decoding problem.

use anyhow::{Context, Result};
use burn::prelude::*;

use crate::data::{
    batcher::{id_tensor, ModelInput},
    preprocessor::{convert_to_id, pad_corpus, split_chars},
    vocab::Vocabulary,
};
use crate::domain::strength::{Prediction, StrengthLabel};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    model::TransformerSeq2Seq,
    seq2seq::{argmax_ids, Seq2SeqModel},
    InferBackend,
};

/// Decode one password to a full prediction (label, raw id, recognised flag).
pub fn predict<B: Backend, M: Seq2SeqModel<B>>(
    password:     &str,
    source_vocab: &Vocabulary,
    target_vocab: &Vocabulary,
    model:        &M,
    device:       &B::Device,
) -> Result<Prediction> {
    let (source, target) = pad_corpus(&[split_chars(password)], &[Vec::new()]);
    let source = convert_to_id(source_vocab, &source);
    let target = convert_to_id(target_vocab, &target);

    let logits = model.forward(ModelInput {
        source:        id_tensor(&source, device)?,
        decoder_input: id_tensor(&target, device)?,
    });

    let first = argmax_ids(logits)
        .first()
        .and_then(|row| row.first().copied())
        .context("model produced no output positions")?;

    // Arg-max ids are never negative; an out-of-range value still falls back.
    let output_id  = u32::try_from(first).unwrap_or(u32::MAX);
    let prediction = Prediction::from_output_id(output_id);

    if prediction.is_fallback() {
        tracing::warn!(
            "Model output id {} is not a strength label; reporting {}",
            output_id,
            prediction.label,
        );
    }
    tracing::debug!("Decoded output id {} → {}", output_id, prediction.label);

    Ok(prediction)
}

/// Classify one password as WEAK, MEDIUM or STRONG.
pub fn classify<B: Backend, M: Seq2SeqModel<B>>(
    password:     &str,
    source_vocab: &Vocabulary,
    target_vocab: &Vocabulary,
    model:        &M,
    device:       &B::Device,
) -> Result<StrengthLabel> {
    predict(password, source_vocab, target_vocab, model, device).map(|p| p.label)
}

// ─── Inferencer ───────────────────────────────────────────────────────────────
/// A checkpointed model bundled with the vocabularies it was trained on.
pub struct Inferencer<B: Backend = InferBackend> {
    model:        TransformerSeq2Seq<B>,
    source_vocab: Vocabulary,
    target_vocab: Vocabulary,
    device:       B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        source_vocab: Vocabulary,
        target_vocab: Vocabulary,
        device:       B::Device,
    ) -> Result<Self> {
        let cfg = ckpt_manager.load_config()?;

        // Same architecture as training, dropout off.
        let mut model_cfg = cfg.model_config(source_vocab.len(), target_vocab.len());
        model_cfg.dropout = 0.0;

        let model: TransformerSeq2Seq<B> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from '{}'", ckpt_manager.dir().display());

        Ok(Self { model, source_vocab, target_vocab, device })
    }

    pub fn predict(&self, password: &str) -> Result<Prediction> {
        predict(password, &self.source_vocab, &self.target_vocab, &self.model, &self.device)
    }
}
