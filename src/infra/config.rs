// ============================================================
// Layer 6 — Service Configuration
// ============================================================
// Optional JSON file passed with `--config`. Every key is
// optional; anything left out keeps its default, and CLI flags
// given explicitly override what the file says.
//
// Example:
//   {
//     "model_path":      "model/xgb_attrition_model_encoded.json",
//     "variant":         "standard",
//     "fallback_schema": null,
//     "extra_defaults":  { "MonthlyIncome": 5200.0 },
//     "audit_log":       "logs/predictions.csv"
//   }

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::fields::InputVariant;
use crate::infra::model_store::DEFAULT_MODEL_PATH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// XGBoost JSON model file
    pub model_path:      PathBuf,
    /// Which input fields requests carry
    pub variant:         InputVariant,
    /// Column order used when the model declares no feature names;
    /// None means the built-in training order
    pub fallback_schema: Option<Vec<String>>,
    /// Entries overlaid on the built-in default value table
    pub extra_defaults:  BTreeMap<String, f64>,
    /// CSV file receiving one row per served prediction
    pub audit_log:       Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path:      PathBuf::from(DEFAULT_MODEL_PATH),
            variant:         InputVariant::Standard,
            fallback_schema: None,
            extra_defaults:  BTreeMap::new(),
            audit_log:       None,
        }
    }
}

impl ServiceConfig {
    /// Read a config file; missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        let cfg: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;

        if let Some(schema) = &cfg.fallback_schema {
            anyhow::ensure!(!schema.is_empty(), "fallback_schema must not be empty");
        }

        tracing::debug!("Loaded config from '{}'", path.display());
        Ok(cfg)
    }
}
