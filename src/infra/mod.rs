// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Persistence concerns shared by training and inference:
//
//   checkpoint.rs   : model weights (Burn CompactRecorder) and
//                     the training config needed to rebuild the
//                     architecture at inference time
//
//   vocab_store.rs  : the source and target vocabularies as JSON,
//                     so inference maps characters and labels to
//                     the same ids training used
//
//   metrics.rs      : per-epoch perplexity/accuracy CSV log

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vocabulary saving and loading
pub mod vocab_store;

/// Training metrics CSV logger
pub mod metrics;
