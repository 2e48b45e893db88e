// ============================================================
// Layer 5 — Gradient-Boosted Tree Classifier
// ============================================================
// Evaluates a binary XGBoost model saved with
// `booster.save_model("model.json")`, without linking XGBoost.
//
// Relevant parts of the JSON document:
//
//   learner
//     ├── feature_names          ["Age", "OverTime_Yes", ...]
//     ├── learner_model_param    { base_score: "5E-1", num_feature: "45" }
//     ├── objective              { name: "binary:logistic" }
//     └── gradient_booster
//           ├── name             "gbtree"
//           └── model.trees[]    parallel arrays, one entry per node:
//                 left_children, right_children   (-1 on leaves)
//                 split_indices                   (feature index)
//                 split_conditions                (threshold, or leaf value)
//                 default_left                    (route for missing values)
//
// Scoring one row:
//   margin = logit(base_score) + Σ leaf value reached in each tree
//   P(Yes) = sigmoid(margin)
//
// A split sends a row left iff value < threshold, compared in
// f32 as XGBoost does; NaN follows default_left.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::traits::Classifier;
use crate::error::{ClassifierError, SchemaUnavailableError};

const SUPPORTED_OBJECTIVES: &[&str] = &["binary:logistic", "reg:logistic"];

#[derive(Debug, Error)]
pub enum ModelFormatError {
    #[error("cannot read model file '{path}': {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported objective '{0}' (expected binary:logistic)")]
    UnsupportedObjective(String),

    #[error("unsupported booster '{0}' (expected gbtree)")]
    UnsupportedBooster(String),

    #[error("invalid model parameter {name}: {value:?}")]
    InvalidParam { name: &'static str, value: String },

    #[error("tree {tree}: {message}")]
    InvalidTree { tree: usize, message: String },
}

// ─── JSON layout ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ModelDocument {
    learner: LearnerJson,
}

#[derive(Deserialize)]
struct LearnerJson {
    #[serde(default)]
    feature_names:       Vec<String>,
    learner_model_param: ModelParamJson,
    objective:           ObjectiveJson,
    gradient_booster:    BoosterJson,
}

#[derive(Deserialize)]
struct ModelParamJson {
    base_score:  String,
    num_feature: String,
}

#[derive(Deserialize)]
struct ObjectiveJson {
    name: String,
}

#[derive(Deserialize)]
struct BoosterJson {
    name:  String,
    model: Option<TreesJson>,
}

#[derive(Deserialize)]
struct TreesJson {
    trees: Vec<TreeJson>,
}

#[derive(Deserialize)]
struct TreeJson {
    left_children:    Vec<i64>,
    right_children:   Vec<i64>,
    split_indices:    Vec<i64>,
    split_conditions: Vec<f32>,
    default_left:     Vec<Flag>,
    #[serde(default)]
    split_type:       Vec<u8>,
}

/// default_left is written as 0/1 by recent XGBoost and as
/// booleans by some older exporters
#[derive(Deserialize, Clone, Copy)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(n)  => n != 0,
        }
    }
}

// ─── Compiled trees ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(f32),
    Split {
        feature:      usize,
        threshold:    f32,
        left:         usize,
        right:        usize,
        default_left: bool,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn compile(index: usize, raw: TreeJson, num_feature: usize) -> Result<Self, ModelFormatError> {
        let bad = |message: String| ModelFormatError::InvalidTree { tree: index, message };

        let n = raw.left_children.len();
        if n == 0 {
            return Err(bad("tree has no nodes".into()));
        }
        let lengths = [
            raw.right_children.len(),
            raw.split_indices.len(),
            raw.split_conditions.len(),
            raw.default_left.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(bad(format!("node arrays disagree in length ({n} vs {lengths:?})")));
        }
        if raw.split_type.iter().any(|&t| t != 0) {
            return Err(bad("categorical splits are not supported".into()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (raw.left_children[i], raw.right_children[i]);
            if left == -1 {
                nodes.push(Node::Leaf(raw.split_conditions[i]));
                continue;
            }

            // Children always follow their parent, which also rules out cycles
            let child = |c: i64| -> Result<usize, ModelFormatError> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| bad(format!("node {i} has invalid child {c}")))
            };
            let feature = usize::try_from(raw.split_indices[i])
                .ok()
                .filter(|&f| f < num_feature)
                .ok_or_else(|| bad(format!(
                    "node {i} splits on feature {} of {num_feature}", raw.split_indices[i]
                )))?;

            nodes.push(Node::Split {
                feature,
                threshold:    raw.split_conditions[i],
                left:         child(left)?,
                right:        child(right)?,
                default_left: raw.default_left[i].is_set(),
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, row: &[f64]) -> f32 {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf(value) => return *value,
                Node::Split { feature, threshold, left, right, default_left } => {
                    let x = row[*feature];
                    i = if x.is_nan() {
                        if *default_left { *left } else { *right }
                    } else if (x as f32) < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

// ─── GradientBoostedTrees ─────────────────────────────────────────────────────

/// An immutable, thread-safe binary boosted-tree ensemble.
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    feature_names: Vec<String>,
    num_feature:   usize,
    base_margin:   f64,
    trees:         Vec<Tree>,
}

impl GradientBoostedTrees {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelFormatError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelFormatError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ModelFormatError> {
        let doc: ModelDocument = serde_json::from_str(text)?;
        let learner = doc.learner;

        if !SUPPORTED_OBJECTIVES.contains(&learner.objective.name.as_str()) {
            return Err(ModelFormatError::UnsupportedObjective(learner.objective.name));
        }
        if learner.gradient_booster.name != "gbtree" {
            return Err(ModelFormatError::UnsupportedBooster(learner.gradient_booster.name));
        }

        let param = learner.learner_model_param;
        let num_feature: usize = param.num_feature.trim().parse().map_err(|_| {
            ModelFormatError::InvalidParam { name: "num_feature", value: param.num_feature.clone() }
        })?;
        let base_margin = parse_base_margin(&param.base_score)?;

        let feature_names = learner.feature_names;
        if !feature_names.is_empty() && feature_names.len() != num_feature {
            return Err(ModelFormatError::InvalidParam {
                name:  "feature_names",
                value: format!("{} names for {} features", feature_names.len(), num_feature),
            });
        }

        let raw_trees = learner.gradient_booster.model.map(|m| m.trees).unwrap_or_default();
        let trees = raw_trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| Tree::compile(i, t, num_feature))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Compiled boosted-tree model: {} trees, {} features, base margin {:.4}",
            trees.len(),
            num_feature,
            base_margin
        );

        Ok(Self { feature_names, num_feature, base_margin, trees })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_features(&self) -> usize {
        self.num_feature
    }

    /// Raw log-odds for one row; the row length must already be checked
    fn margin(&self, row: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| f64::from(t.leaf_value(row))).sum::<f64>()
    }
}

impl Classifier for GradientBoostedTrees {
    fn feature_schema(&self) -> Result<&[String], SchemaUnavailableError> {
        if self.feature_names.is_empty() {
            Err(SchemaUnavailableError {
                reason: "model artifact declares no feature_names".to_string(),
            })
        } else {
            Ok(&self.feature_names)
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError> {
        if row.len() != self.num_feature {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.num_feature,
                actual:   row.len(),
            });
        }
        let prob_yes = sigmoid(self.margin(row));
        Ok([1.0 - prob_yes, prob_yes])
    }

    fn describe(&self) -> String {
        format!("gbtree ({} trees, {} features)", self.trees.len(), self.num_feature)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// base_score is stored in probability space, either as "5E-1"
/// or, from XGBoost 3 on, as a one-element list "[5E-1]".
fn parse_base_margin(raw: &str) -> Result<f64, ModelFormatError> {
    let invalid = || ModelFormatError::InvalidParam { name: "base_score", value: raw.to_string() };

    let p: f64 = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .parse()
        .map_err(|_| invalid())?;

    if !(p > 0.0 && p < 1.0) {
        return Err(invalid());
    }
    Ok((p / (1.0 - p)).ln())
}
