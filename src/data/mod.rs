// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from a raw CSV corpus to tensor batches.
//
//   password,strength CSV
//       │
//       ▼
//   CsvCorpusLoader   → LabeledPassword rows
//       │
//       ▼
//   preprocessor      → characters, pad_corpus, convert_to_id
//       │                (ids come from a Vocabulary)
//       ▼
//   ParallelCorpus    → paired fixed-width id rows
//       │
//       ▼
//   shuffler          → one shared permutation per epoch
//       │
//       ▼
//   batch_ranges      → contiguous batches, final short batch kept
//       │
//       ▼
//   Seq2SeqBatcher    → Window (decoder input / loss target / mask)
//                       stacked into Burn tensors for the model

/// Reads `password,strength` CSV files
pub mod loader;

/// Token ↔ id mapping with reserved padding/unknown ids
pub mod vocab;

/// Padding and id conversion applied identically for training and inference
pub mod preprocessor;

/// Paired source/target id rows, served through Burn's Dataset trait
pub mod dataset;

/// Per-epoch permutation and the train/test split
pub mod shuffler;

/// Teacher-forcing windows and loss masks
pub mod window;

/// Batch ranges and the Burn Batcher that builds model tensors
pub mod batcher;
