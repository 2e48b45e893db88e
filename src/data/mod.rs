// ============================================================
// Layer 4 — Feature Pipeline
// ============================================================
// Everything between a raw request and the numeric row the
// classifier sees. The pipeline flows in this order:
//
//   RawInput
//       │
//       ▼
//   FeatureEncoder    → CategoryEncoder (one-hot) +
//       │               NumericNormalizer (f64 + defaults)
//       ▼
//   EncodedRecord     → column name → value
//       │
//       ▼
//   SchemaReconciler  → model column order, DefaultValueTable,
//       │               zero-fill, drop extras
//       ▼
//   FeatureVector     → handed to Layer 5
//
// All of it is pure computation: no I/O, no shared mutable state.

/// Column name → value map produced by encoding
pub mod encoded_record;

/// One-hot encoding of categorical fields
pub mod encoder;

/// Numeric coercion with per-field defaults
pub mod normalizer;

/// Variant-keyed encoder combining the two above
pub mod feature_encoder;

/// Process-wide neutral values for unsupplied columns
pub mod defaults;

/// Projection of an EncodedRecord onto the model schema
pub mod reconciler;

/// Random RawInput generation for form pre-fill
pub mod sampler;
