// ============================================================
// Layer 6 — Model Store
// ============================================================
// Loads the trained XGBoost model from a JSON file on local disk.
//
// Expected layout:
//   model/
//     xgb_attrition_model_encoded.json   ← booster.save_model(...)
//
// Every failure (missing file, unreadable JSON, unsupported
// objective) is reported as ModelUnavailableError; the caller
// decides whether that fails one request or the whole command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::traits::{Classifier, ModelLoader};
use crate::error::ModelUnavailableError;
use crate::ml::booster::GradientBoostedTrees;

pub const DEFAULT_MODEL_PATH: &str = "model/xgb_attrition_model_encoded.json";

/// Loads a GradientBoostedTrees classifier from one JSON file.
#[derive(Debug, Clone)]
pub struct LocalModelStore {
    path: PathBuf,
}

impl LocalModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for LocalModelStore {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH)
    }
}

impl ModelLoader for LocalModelStore {
    fn load_model(&self) -> Result<Arc<dyn Classifier>, ModelUnavailableError> {
        if !self.path.exists() {
            return Err(ModelUnavailableError::new(format!(
                "model file '{}' not found. Export the trained booster with save_model() first.",
                self.path.display()
            )));
        }

        let model = GradientBoostedTrees::from_path(&self.path)
            .map_err(|e| ModelUnavailableError::new(e.to_string()))?;

        tracing::info!(
            "Loaded model '{}' ({} trees, {} features)",
            self.path.display(),
            model.num_trees(),
            model.num_features()
        );

        Ok(Arc::new(model))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::testing::{tiny_model_json, TINY_MODEL_FEATURES};
    use std::fs;

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir   = tempfile::tempdir().unwrap();
        let store = LocalModelStore::new(dir.path().join("nope.json"));
        let err   = store.load_model().err().unwrap();
        assert!(err.reason.contains("not found"), "{}", err.reason);
    }

    #[test]
    fn test_invalid_json_is_unavailable() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();

        let err = LocalModelStore::new(&path).load_model().err().unwrap();
        assert!(err.reason.contains("invalid model JSON"), "{}", err.reason);
    }

    #[test]
    fn test_loads_valid_model() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, tiny_model_json(true)).unwrap();

        let model = LocalModelStore::new(&path).load_model().unwrap();
        assert_eq!(model.feature_schema().unwrap(), &TINY_MODEL_FEATURES.map(String::from));
    }

    #[test]
    fn test_default_path() {
        assert_eq!(LocalModelStore::default().path(), Path::new(DEFAULT_MODEL_PATH));
    }
}
