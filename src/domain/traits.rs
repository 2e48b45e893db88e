// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams between the prediction core and the outside:
//
//   ModelLoader → supplies a trained classifier (from disk, a
//                 registry, a test stub...)
//   Classifier  → the trained model itself
//
// The application layer only ever sees these traits, so the
// boosted-tree evaluator in Layer 5 and the stub used in tests
// are interchangeable.

use std::sync::Arc;

use crate::domain::prediction::DECISION_THRESHOLD;
use crate::error::{ClassifierError, ModelUnavailableError, SchemaUnavailableError};

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A trained binary classifier over a fixed-width numeric row.
///
/// Implementations must be immutable once built: the same instance
/// is shared across threads for the lifetime of the process.
pub trait Classifier: Send + Sync {
    /// Ordered column names the model was trained on.
    fn feature_schema(&self) -> Result<&[String], SchemaUnavailableError>;

    /// Class probabilities `[P(No), P(Yes)]` for one row.
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError>;

    /// Hard class label, 1 = attrition.
    fn predict_label(&self, row: &[f64]) -> Result<u8, ClassifierError> {
        let [_, prob_yes] = self.predict_proba(row)?;
        Ok(u8::from(prob_yes > DECISION_THRESHOLD))
    }

    /// Short human-readable description for logs
    fn describe(&self) -> String {
        "classifier".to_string()
    }
}

// ─── ModelLoader ──────────────────────────────────────────────────────────────
/// Anything that can produce a ready-to-use classifier.
pub trait ModelLoader: Send + Sync {
    fn load_model(&self) -> Result<Arc<dyn Classifier>, ModelUnavailableError>;
}
