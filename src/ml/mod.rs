// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// Everything that runs a forward or backward pass lives here.
//
//   seq2seq.rs    : the Seq2SeqModel trait the loops are written
//                   against, plus masked loss / accuracy helpers
//
//   model.rs      : character-level encoder/decoder transformer
//                   • token + positional embeddings
//                   • encoder self-attention blocks
//                   • causal decoder blocks with cross-attention
//                   • linear head over the target vocabulary
//
//   trainer.rs    : one shuffled epoch of teacher-forced training
//                   with an Adam step per batch
//
//   evaluator.rs  : in-order pass producing perplexity and
//                   token-weighted accuracy
//
//   inferencer.rs : single password → WEAK / MEDIUM / STRONG
//
// Training runs on TrainBackend (autodiff). Evaluation and
// inference run on InferBackend, the inner backend returned by
// model.valid(), so they can never apply gradients.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

use burn::backend::{Autodiff, Wgpu};

/// Backend used by the training binary.
pub type TrainBackend = Autodiff<Wgpu>;

/// Backend used for evaluation and inference.
pub type InferBackend = Wgpu;

/// The model contract the loops depend on
pub mod seq2seq;

/// Transformer encoder/decoder architecture
pub mod model;

/// Training loop
pub mod trainer;

/// Evaluation loop: perplexity and accuracy
pub mod evaluator;

/// Inference: one password to a strength label
pub mod inferencer;
