// ============================================================
// Error Taxonomy
// ============================================================
// Request-level errors carry enough context to be shown to a
// caller as-is. Degraded-but-served conditions (a model with no
// introspectable schema) are NOT errors of the request; they are
// reported through SchemaOrigin on the outcome instead.

use thiserror::Error;

/// A numeric field was present but not a finite number, or was
/// absent while the strict (form) policy was active.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("field '{field}' is not a number: {value:?}")]
    NotNumeric { field: String, value: String },

    #[error("field '{field}' is not finite: {value}")]
    NotFinite { field: String, value: String },

    #[error("field '{field}' is required")]
    Missing { field: String },
}

impl ConversionError {
    pub fn not_numeric(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotNumeric { field: field.into(), value: value.into() }
    }

    pub fn not_finite(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotFinite { field: field.into(), value: value.into() }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing { field: field.into() }
    }

    /// Name of the offending input field
    pub fn field(&self) -> &str {
        match self {
            Self::NotNumeric { field, .. }
            | Self::NotFinite { field, .. }
            | Self::Missing { field } => field,
        }
    }
}

/// A classifier rejected a row or produced unusable output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("invalid classifier output: {0}")]
    InvalidOutput(String),
}

/// Raw input could not be turned into an EncodedRecord.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// The loaded model does not declare its feature names.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("model schema unavailable: {reason}")]
pub struct SchemaUnavailableError {
    pub reason: String,
}

/// The classifier could not produce a usable prediction for a row.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("prediction failed: {message}")]
pub struct PredictionError {
    pub message: String,
}

impl PredictionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<ClassifierError> for PredictionError {
    fn from(e: ClassifierError) -> Self {
        Self::new(e.to_string())
    }
}

/// No classifier could be supplied by the model loader.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("model unavailable: {reason}")]
pub struct ModelUnavailableError {
    pub reason: String,
}

impl ModelUnavailableError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Everything `encode_and_predict` can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    ModelUnavailable(#[from] ModelUnavailableError),
}

impl PipelineError {
    /// Stable, machine-readable error category for JSON responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Encoding(_)         => "encoding_error",
            Self::Prediction(_)       => "prediction_error",
            Self::ModelUnavailable(_) => "model_unavailable",
        }
    }
}

impl From<ConversionError> for PipelineError {
    fn from(e: ConversionError) -> Self {
        Self::Encoding(EncodingError::Conversion(e))
    }
}
