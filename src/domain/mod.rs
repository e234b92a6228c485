// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// system is about: labelled passwords and strength categories.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Everything here can be unit tested without a GPU.

// Strength categories and the model output id lookup
pub mod strength;

// A password paired with its strength label, as read from a corpus
pub mod labeled_password;

// Core abstractions (traits) that other layers implement
pub mod traits;
