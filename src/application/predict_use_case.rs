// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Orchestrates one prediction request end to end:
//
//   Step 1: Encode the raw input          (Layer 4 - data)
//   Step 2: Get the serving classifier    (Layer 6 - infra)
//   Step 3: Align to the model schema     (Layer 4 - data)
//   Step 4: Predict and interpret         (Layer 5 - ml)
//   Step 5: Append to the audit log       (Layer 6 - infra)
//
// Encoding runs before the model is touched, so a malformed
// request is rejected even when no model is available and the
// classifier is never invoked for it.
//
// One PredictUseCase is shared by every request (and every batch
// worker thread); it holds no per-request state.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::data::{
    defaults::DefaultValueTable,
    feature_encoder::FeatureEncoder,
    normalizer::MissingPolicy,
    reconciler::SchemaReconciler,
};
use crate::domain::{
    fields::InputVariant,
    prediction::{AttritionLabel, PredictionOutcome, SchemaOrigin},
    raw_input::RawInput,
};
use crate::error::{ModelUnavailableError, PipelineError};
use crate::infra::{
    audit_log::AuditLog,
    config::ServiceConfig,
    model_handle::SharedModel,
    model_store::LocalModelStore,
};
use crate::ml::interpreter::PredictionInterpreter;

// ─── Response shapes ──────────────────────────────────────────────────────────
/// One JSON response line, echoing the request's features.
///
///   {"prediction":"Yes","confidence":"70.00%","features":{...}}
///   {"error":"field 'Age' is not a number: \"abc\"","kind":"encoding_error","features":{...}}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Served {
        prediction: AttritionLabel,
        confidence: String,
        features:   RawInput,
    },
    Failed {
        error:    String,
        kind:     &'static str,
        features: Option<RawInput>,
    },
}

impl ApiResponse {
    pub fn from_outcome(
        features: &RawInput,
        result:   &Result<PredictionOutcome, PipelineError>,
    ) -> Self {
        match result {
            Ok(outcome) => ApiResponse::Served {
                prediction: outcome.result.label,
                confidence: outcome.result.confidence(),
                features:   features.clone(),
            },
            Err(e) => ApiResponse::Failed {
                error:    e.to_string(),
                kind:     e.kind(),
                features: Some(features.clone()),
            },
        }
    }

    /// A request line that never became a RawInput
    pub fn invalid_request(error: impl Into<String>) -> Self {
        ApiResponse::Failed { error: error.into(), kind: "invalid_request", features: None }
    }

    pub fn is_served(&self) -> bool {
        matches!(self, ApiResponse::Served { .. })
    }
}

// ─── PredictUseCase ───────────────────────────────────────────────────────────
pub struct PredictUseCase {
    variant:     InputVariant,
    reconciler:  SchemaReconciler,
    interpreter: PredictionInterpreter,
    model:       Arc<SharedModel>,
    audit:       Option<AuditLog>,
}

impl PredictUseCase {
    pub fn new(variant: InputVariant, reconciler: SchemaReconciler, model: Arc<SharedModel>) -> Self {
        Self {
            variant,
            reconciler,
            interpreter: PredictionInterpreter::new(),
            model,
            audit: None,
        }
    }

    /// Wire up the file-backed model store, defaults and audit log
    /// described by `cfg`. The model and the audit file are both
    /// opened on first use.
    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        let defaults = Arc::new(DefaultValueTable::builtin().with_overrides(&cfg.extra_defaults));

        let reconciler = match &cfg.fallback_schema {
            Some(columns) => SchemaReconciler::new(defaults, columns.clone()),
            None          => SchemaReconciler::with_training_fallback(defaults),
        };

        let store = Arc::new(LocalModelStore::new(&cfg.model_path));
        let model = Arc::new(SharedModel::new(store));

        let mut use_case = Self::new(cfg.variant, reconciler, model);
        if let Some(path) = &cfg.audit_log {
            use_case = use_case.with_audit_log(AuditLog::new(path));
        }

        tracing::debug!(
            "PredictUseCase ready: variant={}, model='{}'",
            cfg.variant,
            cfg.model_path.display()
        );
        Ok(use_case)
    }

    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn variant(&self) -> InputVariant {
        self.variant
    }

    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    /// API-shaped request: absent numeric fields take their defaults.
    pub fn encode_and_predict(&self, input: &RawInput) -> Result<PredictionOutcome, PipelineError> {
        self.encode_and_predict_with(input, MissingPolicy::Lenient)
    }

    /// Form-shaped request: every numeric field must be supplied.
    pub fn encode_and_predict_form(&self, input: &RawInput) -> Result<PredictionOutcome, PipelineError> {
        self.encode_and_predict_with(input, MissingPolicy::Strict)
    }

    pub fn encode_and_predict_with(
        &self,
        input:  &RawInput,
        policy: MissingPolicy,
    ) -> Result<PredictionOutcome, PipelineError> {
        // ── Step 1: Encode ───────────────────────────────────────────────────
        let record = FeatureEncoder::new(self.variant, policy).encode(input)?;

        // ── Step 2: Serving classifier ───────────────────────────────────────
        let classifier = self.model.get_or_load()?;

        // ── Step 3: Align to schema ──────────────────────────────────────────
        let reconciled = self.reconciler.reconcile(&record, classifier.feature_schema());

        // ── Step 4: Predict ──────────────────────────────────────────────────
        let result = self.interpreter.interpret(classifier.as_ref(), &reconciled.vector)?;

        let outcome = PredictionOutcome {
            result,
            schema_origin: reconciled.origin,
            variant:       self.variant,
        };

        // ── Step 5: Audit ────────────────────────────────────────────────────
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.record(&outcome) {
                tracing::warn!("Could not write audit log '{}': {:#}", audit.csv_path().display(), e);
            }
        }

        Ok(outcome)
    }

    /// The column order requests are currently aligned to.
    pub fn active_schema(&self) -> Result<(Vec<String>, SchemaOrigin), ModelUnavailableError> {
        let classifier = self.model.get_or_load()?;
        Ok(match classifier.feature_schema() {
            Ok(columns) => (columns.to_vec(), SchemaOrigin::Model),
            Err(e) => (
                self.reconciler.fallback_schema().to_vec(),
                SchemaOrigin::Fallback { reason: e.reason },
            ),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reconciler::TRAINING_COLUMNS;
    use crate::domain::traits::Classifier;
    use crate::error::{ClassifierError, EncodingError};
    use crate::ml::booster::GradientBoostedTrees;
    use crate::ml::testing::{tiny_model_json, StaticLoader, StubClassifier};

    fn use_case_with(stub: Arc<StubClassifier>, variant: InputVariant) -> PredictUseCase {
        let model = Arc::new(SharedModel::new(StaticLoader::serving(stub)));
        let reconciler =
            SchemaReconciler::with_training_fallback(Arc::new(DefaultValueTable::builtin().clone()));
        PredictUseCase::new(variant, reconciler, model)
    }

    fn training_stub(proba: [f64; 2]) -> Arc<StubClassifier> {
        Arc::new(StubClassifier::returning(proba).with_schema(TRAINING_COLUMNS))
    }

    fn scenario_input() -> RawInput {
        RawInput::new()
            .with("OverTime", "Yes")
            .with("MaritalStatus", "Single")
            .with("JobRole", "Manager")
            .with("BusinessTravel", "Travel_Rarely")
            .with("StockOptionLevel", 1i64)
            .with("JobLevel", 2i64)
            .with("EnvironmentSatisfaction", 3i64)
            .with("JobInvolvement", 3i64)
            .with("JobSatisfaction", 3i64)
    }

    fn value_of(row: &[f64], column: &str) -> f64 {
        let i = TRAINING_COLUMNS.iter().position(|c| *c == column).unwrap();
        row[i]
    }

    #[test]
    fn test_manager_overtime_scenario() {
        let stub = training_stub([0.3, 0.7]);
        let uc   = use_case_with(stub.clone(), InputVariant::Standard);

        let outcome = uc.encode_and_predict(&scenario_input()).unwrap();
        assert_eq!(outcome.result.label, AttritionLabel::Yes);
        assert_eq!(outcome.result.confidence(), "70.00%");
        assert_eq!(outcome.schema_origin, SchemaOrigin::Model);

        let row = stub.last_row();
        assert_eq!(row.len(), TRAINING_COLUMNS.len());
        assert_eq!(value_of(&row, "OverTime_Yes"), 1.0);
        assert_eq!(value_of(&row, "JobRole_Manager"), 1.0);
        assert_eq!(value_of(&row, "JobRole_Sales Executive"), 0.0);
        assert_eq!(value_of(&row, "Age"), 35.0);
        assert_eq!(value_of(&row, "MonthlyIncome"), 6000.0);
    }

    #[test]
    fn test_malformed_number_never_reaches_classifier() {
        let stub  = training_stub([0.3, 0.7]);
        let uc    = use_case_with(stub.clone(), InputVariant::Standard);
        let input = scenario_input().with("StockOptionLevel", "abc");

        let err = uc.encode_and_predict(&input).unwrap_err();
        assert!(matches!(err, PipelineError::Encoding(EncodingError::Conversion(_))));
        assert_eq!(err.kind(), "encoding_error");
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn test_form_requires_every_numeric_field() {
        let uc  = use_case_with(training_stub([0.3, 0.7]), InputVariant::Standard);
        let err = uc.encode_and_predict_form(&scenario_input()).unwrap_err();
        assert!(err.to_string().contains("'Age' is required"), "{}", err);

        let full = scenario_input().with("Age", "41");
        assert!(uc.encode_and_predict_form(&full).is_ok());
    }

    #[test]
    fn test_unknown_schema_column_is_zero() {
        let stub = Arc::new(
            StubClassifier::returning([0.6, 0.4]).with_schema(&["Age", "BrandNewColumn", "OverTime_Yes"]),
        );
        let uc = use_case_with(stub.clone(), InputVariant::Standard);

        uc.encode_and_predict(&scenario_input()).unwrap();
        assert_eq!(stub.last_row(), vec![35.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vector_follows_model_schema_order() {
        let stub = Arc::new(
            StubClassifier::returning([0.6, 0.4]).with_schema(&["JobLevel", "OverTime_No", "StockOptionLevel"]),
        );
        let uc = use_case_with(stub.clone(), InputVariant::Standard);

        uc.encode_and_predict(&scenario_input()).unwrap();
        assert_eq!(stub.last_row(), vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_same_input_same_vector() {
        let stub = training_stub([0.3, 0.7]);
        let uc   = use_case_with(stub.clone(), InputVariant::Standard);

        uc.encode_and_predict(&scenario_input()).unwrap();
        let first = stub.last_row();
        uc.encode_and_predict(&scenario_input()).unwrap();
        assert_eq!(stub.last_row(), first);
    }

    #[test]
    fn test_fallback_order_when_model_has_no_schema() {
        let stub = Arc::new(StubClassifier::returning([0.3, 0.7]));
        let uc   = use_case_with(stub.clone(), InputVariant::Standard);

        let outcome = uc.encode_and_predict(&scenario_input()).unwrap();
        assert!(outcome.schema_origin.is_fallback());
        assert_eq!(stub.last_row().len(), TRAINING_COLUMNS.len());

        let (columns, origin) = uc.active_schema().unwrap();
        assert_eq!(columns.len(), TRAINING_COLUMNS.len());
        assert!(origin.is_fallback());
    }

    #[test]
    fn test_legacy_variant_encodes_education_field() {
        let stub  = training_stub([0.3, 0.7]);
        let uc    = use_case_with(stub.clone(), InputVariant::Legacy);
        let input = scenario_input().with("EducationField", "Medical");

        let outcome = uc.encode_and_predict(&input).unwrap();
        assert_eq!(outcome.variant, InputVariant::Legacy);
        assert_eq!(value_of(&stub.last_row(), "EducationField_Medical"), 1.0);
        assert_eq!(value_of(&stub.last_row(), "EducationField_Life Sciences"), 0.0);
        // Age is not a legacy field; the default table still fills it
        assert_eq!(value_of(&stub.last_row(), "Age"), 35.0);
    }

    #[test]
    fn test_missing_model_is_request_error() {
        let model = Arc::new(SharedModel::new(StaticLoader::empty()));
        let uc = PredictUseCase::new(
            InputVariant::Standard,
            SchemaReconciler::with_training_fallback(Arc::new(DefaultValueTable::builtin().clone())),
            model,
        );

        let err = uc.encode_and_predict(&scenario_input()).unwrap_err();
        assert_eq!(err.kind(), "model_unavailable");
    }

    #[test]
    fn test_classifier_failure_is_prediction_error() {
        let stub = Arc::new(
            StubClassifier::failing(ClassifierError::ShapeMismatch { expected: 3, actual: 45 })
                .with_schema(TRAINING_COLUMNS),
        );
        let uc  = use_case_with(stub, InputVariant::Standard);
        let err = uc.encode_and_predict(&scenario_input()).unwrap_err();
        assert_eq!(err.kind(), "prediction_error");
    }

    #[test]
    fn test_with_real_booster() {
        let booster: Arc<dyn Classifier> =
            Arc::new(GradientBoostedTrees::from_json_str(&tiny_model_json(true)).unwrap());
        let model = Arc::new(SharedModel::new(StaticLoader::serving(booster)));
        let uc = PredictUseCase::new(
            InputVariant::Standard,
            SchemaReconciler::with_training_fallback(Arc::new(DefaultValueTable::builtin().clone())),
            model,
        );

        // OverTime_Yes = 1 → +0.6; Age 35 ≥ 30 → -0.2; margin 0.4
        let outcome = uc.encode_and_predict(&scenario_input()).unwrap();
        let expected = 1.0 / (1.0 + (-0.4f64).exp());
        assert_eq!(outcome.result.label, AttritionLabel::Yes);
        assert!((outcome.result.probability - expected).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_requests() {
        let stub = training_stub([0.3, 0.7]);
        let uc   = use_case_with(stub.clone(), InputVariant::Standard);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..25 {
                        let outcome = uc.encode_and_predict(&scenario_input()).unwrap();
                        assert_eq!(outcome.result.confidence(), "70.00%");
                    }
                });
            }
        });
        assert_eq!(stub.calls(), 200);
    }

    #[test]
    fn test_audit_log_receives_served_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let uc  = use_case_with(training_stub([0.3, 0.7]), InputVariant::Standard)
            .with_audit_log(AuditLog::new(dir.path().join("audit.csv")));

        uc.encode_and_predict(&scenario_input()).unwrap();
        let _ = uc.encode_and_predict(&scenario_input().with("Age", "old"));

        let text = std::fs::read_to_string(dir.path().join("audit.csv")).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec![
            "variant,prediction,confidence,schema_origin",
            "standard,Yes,70.00%,model",
        ]);
    }

    #[test]
    fn test_api_response_json() {
        let uc     = use_case_with(training_stub([0.3, 0.7]), InputVariant::Standard);
        let input  = RawInput::new().with("OverTime", "Yes");
        let served = ApiResponse::from_outcome(&input, &uc.encode_and_predict(&input));
        assert!(served.is_served());
        assert_eq!(
            serde_json::to_string(&served).unwrap(),
            r#"{"prediction":"Yes","confidence":"70.00%","features":{"OverTime":"Yes"}}"#
        );

        let bad    = RawInput::new().with("Age", "abc");
        let failed = ApiResponse::from_outcome(&bad, &uc.encode_and_predict(&bad));
        let json: serde_json::Value = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["kind"], "encoding_error");
        assert_eq!(json["features"]["Age"], "abc");
    }

    #[test]
    fn test_features_echo_keeps_json_form() {
        let uc    = use_case_with(training_stub([0.3, 0.7]), InputVariant::Standard);
        let input = RawInput::from_json_str(r#"{"JobLevel":2,"OverTime":"Yes"}"#).unwrap();

        let served = ApiResponse::from_outcome(&input, &uc.encode_and_predict(&input));
        assert_eq!(
            serde_json::to_string(&served).unwrap(),
            r#"{"prediction":"Yes","confidence":"70.00%","features":{"JobLevel":2,"OverTime":"Yes"}}"#
        );
    }

    #[test]
    fn test_non_string_categorical_values_encode_as_unknown() {
        let stub  = training_stub([0.6, 0.4]);
        let uc    = use_case_with(stub.clone(), InputVariant::Standard);
        let input = RawInput::from_json_str(
            r#"{"Remote": false, "OverTime": true, "MaritalStatus": ["Single"]}"#,
        )
        .unwrap();

        let outcome = uc.encode_and_predict(&input).unwrap();
        assert_eq!(outcome.result.label, AttritionLabel::No);

        let row = stub.last_row();
        assert_eq!(value_of(&row, "OverTime_Yes"), 0.0);
        assert_eq!(value_of(&row, "OverTime_No"), 0.0);
        assert_eq!(value_of(&row, "MaritalStatus_Single"), 0.0);
    }

    #[test]
    fn test_from_config_defers_audit_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/audit.csv");
        let cfg  = ServiceConfig {
            model_path: dir.path().join("missing-model.json"),
            audit_log:  Some(path.clone()),
            ..ServiceConfig::default()
        };

        let uc = PredictUseCase::from_config(&cfg).unwrap();
        assert!(uc.active_schema().is_err());
        assert!(!path.exists());
        assert!(!dir.path().join("logs").exists());
    }
}
