// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits describing what the system
// works with: raw input fields, the two input variants,
// prediction results, and the classifier abstraction.
//
// Rules for this layer:
//   - NO file I/O
//   - NO model evaluation code
//   - Only plain Rust types and traits

/// Fixed field tables and the Standard / Legacy input variants
pub mod fields;

/// Per-request raw input as received from a form or JSON body
pub mod raw_input;

/// Labels, confidence formatting and outcome types
pub mod prediction;

/// Classifier and ModelLoader abstractions
pub mod traits;
