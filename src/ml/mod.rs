// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All model evaluation code lives here. No other layer knows how
// a boosted tree is scored; they only see the Classifier trait
// from Layer 3.
//
//   booster.rs     — XGBoost JSON loader and tree evaluator
//                    (binary:logistic), exposing the model's
//                    declared feature names as its schema
//
//   interpreter.rs — runs a classifier on one FeatureVector,
//                    applies the 0.5 decision threshold and
//                    formats the confidence; contains failures

/// Native gradient-boosted tree classifier
pub mod booster;

/// Probability → label + confidence
pub mod interpreter;

#[cfg(test)]
pub mod testing;
