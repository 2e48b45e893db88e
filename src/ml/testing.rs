//! Test doubles shared by the unit tests of several layers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::traits::{Classifier, ModelLoader};
use crate::error::{ClassifierError, ModelUnavailableError, SchemaUnavailableError};

pub const TINY_MODEL_FEATURES: [&str; 3] = ["OverTime_Yes", "Age", "MonthlyIncome"];

/// A two-tree XGBoost JSON model over TINY_MODEL_FEATURES.
///
///   tree 0: OverTime_Yes < 0.5 ? -0.4 : +0.6   (missing → left)
///   tree 1: Age < 30           ? +0.3 : -0.2   (missing → right)
///   base_score 0.5 → base margin 0
pub fn tiny_model_json(with_feature_names: bool) -> String {
    let names = if with_feature_names {
        r#""feature_names": ["OverTime_Yes", "Age", "MonthlyIncome"],
           "feature_types": ["float", "float", "float"],"#
    } else {
        ""
    };

    format!(
        r#"{{
  "learner": {{
    "attributes": {{}},
    {names}
    "gradient_booster": {{
      "name": "gbtree",
      "model": {{
        "gbtree_model_param": {{ "num_parallel_tree": "1", "num_trees": "2" }},
        "tree_info": [0, 0],
        "trees": [
          {{
            "id": 0,
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "split_indices": [0, 0, 0],
            "split_conditions": [0.5, -0.4, 0.6],
            "default_left": [1, 0, 0],
            "split_type": [0, 0, 0],
            "base_weights": [0.0, -0.4, 0.6]
          }},
          {{
            "id": 1,
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "split_indices": [1, 0, 0],
            "split_conditions": [30.0, 0.3, -0.2],
            "default_left": [false, false, false],
            "base_weights": [0.0, 0.3, -0.2]
          }}
        ]
      }}
    }},
    "learner_model_param": {{
      "base_score": "5E-1",
      "num_class": "0",
      "num_feature": "3",
      "num_target": "1"
    }},
    "objective": {{ "name": "binary:logistic", "reg_loss_param": {{ "scale_pos_weight": "1" }} }}
  }},
  "version": [2, 0, 3]
}}"#
    )
}

/// Classifier returning fixed probabilities, recording each call.
pub struct StubClassifier {
    pub schema: Option<Vec<String>>,
    pub proba:  Result<[f64; 2], ClassifierError>,
    pub panics: bool,
    calls:      AtomicUsize,
    last_row:   parking_lot::Mutex<Vec<f64>>,
}

impl StubClassifier {
    pub fn returning(proba: [f64; 2]) -> Self {
        Self {
            schema:   None,
            proba:    Ok(proba),
            panics:   false,
            calls:    AtomicUsize::new(0),
            last_row: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ClassifierError) -> Self {
        Self { proba: Err(error), ..Self::returning([0.5, 0.5]) }
    }

    pub fn panicking() -> Self {
        Self { panics: true, ..Self::returning([0.5, 0.5]) }
    }

    pub fn with_schema(mut self, columns: &[&str]) -> Self {
        self.schema = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_row(&self) -> Vec<f64> {
        self.last_row.lock().clone()
    }
}

impl Classifier for StubClassifier {
    fn feature_schema(&self) -> Result<&[String], SchemaUnavailableError> {
        self.schema.as_deref().ok_or_else(|| SchemaUnavailableError {
            reason: "stub has no schema".to_string(),
        })
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_row.lock() = row.to_vec();
        if self.panics {
            panic!("stub classifier blew up");
        }
        self.proba.clone()
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

/// Loader that always hands out the same classifier, or always fails.
pub struct StaticLoader(pub Option<Arc<dyn Classifier>>);

impl StaticLoader {
    pub fn serving(classifier: Arc<dyn Classifier>) -> Arc<Self> {
        Arc::new(Self(Some(classifier)))
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self(None))
    }
}

impl ModelLoader for StaticLoader {
    fn load_model(&self) -> Result<Arc<dyn Classifier>, ModelUnavailableError> {
        self.0
            .clone()
            .ok_or_else(|| ModelUnavailableError::new("no model configured"))
    }
}
