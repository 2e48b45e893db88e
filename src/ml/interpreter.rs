// ============================================================
// Layer 5 — Prediction Interpreter
// ============================================================
// Runs the classifier on one FeatureVector and turns the class
// probabilities into what the user sees:
//
//   [P(No), P(Yes)] = [0.3, 0.7]
//       → label "Yes" (P(Yes) > 0.5), confidence "70.00%"
//
//   [0.5, 0.5]
//       → label "No" (the threshold is strict), confidence "50.00%"
//
// Any classifier failure, including a panic inside it, comes back
// as a PredictionError so one bad request cannot take the process
// down.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::data::reconciler::FeatureVector;
use crate::domain::prediction::{AttritionLabel, PredictionResult};
use crate::domain::traits::Classifier;
use crate::error::{ClassifierError, PredictionError};

#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionInterpreter;

impl PredictionInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn interpret(
        &self,
        classifier: &dyn Classifier,
        vector:     &FeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        let [prob_no, prob_yes] = invoke(classifier, vector.values()).map_err(|e| {
            tracing::warn!("Classifier '{}' failed: {}", classifier.describe(), e);
            e
        })?;

        let label = AttritionLabel::from_probability(prob_yes);
        let probability = match label {
            AttritionLabel::Yes => prob_yes,
            AttritionLabel::No  => prob_no,
        };

        tracing::debug!(
            "P(No)={:.4} P(Yes)={:.4} → {} ({:.2}%)",
            prob_no,
            prob_yes,
            label,
            probability * 100.0
        );

        Ok(PredictionResult { label, probability })
    }
}

fn invoke(classifier: &dyn Classifier, row: &[f64]) -> Result<[f64; 2], PredictionError> {
    let proba = panic::catch_unwind(AssertUnwindSafe(|| classifier.predict_proba(row)))
        .map_err(|payload| {
            PredictionError::new(format!("classifier panicked: {}", panic_message(payload.as_ref())))
        })??;

    check_probabilities(proba)?;
    Ok(proba)
}

fn check_probabilities(proba: [f64; 2]) -> Result<(), ClassifierError> {
    for p in proba {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ClassifierError::InvalidOutput(format!(
                "probabilities {proba:?} are not in [0, 1]"
            )));
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
