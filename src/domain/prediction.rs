// ============================================================
// Layer 3 — Prediction Domain Types
// ============================================================

use std::fmt;

use serde::Serialize;

use crate::domain::fields::InputVariant;

/// P(Yes) must be strictly greater than this to predict "Yes".
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttritionLabel {
    Yes,
    No,
}

impl AttritionLabel {
    /// Apply the fixed decision rule to P(Yes)
    pub fn from_probability(prob_yes: f64) -> Self {
        if prob_yes > DECISION_THRESHOLD {
            AttritionLabel::Yes
        } else {
            AttritionLabel::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttritionLabel::Yes => "Yes",
            AttritionLabel::No  => "No",
        }
    }
}

impl fmt::Display for AttritionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user-facing answer: a label and how sure the model is of it.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub label:       AttritionLabel,
    /// Probability of `label` (the winning class), in [0, 1]
    pub probability: f64,
}

impl PredictionResult {
    /// Confidence as a two-decimal percentage, e.g. "70.00%"
    pub fn confidence(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

/// Where the column order of the feature vector came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// The classifier's own declared feature names
    Model,
    /// The configured fallback order; the model exposed no schema
    Fallback { reason: String },
}

impl SchemaOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SchemaOrigin::Fallback { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaOrigin::Model           => "model",
            SchemaOrigin::Fallback { .. } => "fallback",
        }
    }
}

/// Everything the pipeline reports for one served request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub result:        PredictionResult,
    pub schema_origin: SchemaOrigin,
    pub variant:       InputVariant,
}
