// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// training a model from a CSV corpus, or classifying a password
// with a trained checkpoint.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

/// The training workflow
pub mod train_use_case;

/// The password classification workflow
pub mod classify_use_case;
