// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem or holds state that
// outlives a single request:
//
//   model_store.rs  — Loads the XGBoost JSON model from disk
//                     and implements the ModelLoader trait.
//
//   model_handle.rs — The shared, swappable reference to the
//                     serving classifier. Lazy first load,
//                     atomic reload.
//
//   config.rs       — ServiceConfig, read from an optional
//                     JSON file and overridden by CLI flags.
//
//   audit_log.rs    — Appends served predictions to a CSV file.
//
// The prediction pipeline in Layers 4 and 5 never does I/O;
// it only reaches this layer through the traits in Layer 3.

/// Model file loading
pub mod model_store;

/// Shared classifier reference with reload
pub mod model_handle;

/// Service configuration file
pub mod config;

/// Prediction audit CSV
pub mod audit_log;
