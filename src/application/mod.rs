// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to serve requests.
//
// Rules for this layer:
//   - No encoding or tree math here (that's Layer 4 and 5)
//   - No printing or argument parsing here (that's Layer 1)
//   - No direct file access (that's Layer 6)
//   - Only workflow coordination
//
// Both use cases are safe to share across threads: the only
// mutable state they reach is the SharedModel in Layer 6.

// Single-request prediction workflow
pub mod predict_use_case;

// JSON-lines batch workflow with in-stream reloads
pub mod batch_use_case;
