//! Error taxonomy for the inference pipeline.

use std::path::PathBuf;

/// Errors produced while loading the classifier artifact.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported artifact format: {0}")]
    UnsupportedFormat(String),

    #[error("incompatible artifact: {0}")]
    Incompatible(String),

    #[error("corrupt artifact: {0}")]
    Corrupt(String),
}

/// Errors produced by payload validation. Variants are ordered by the
/// precedence in which the validator checks them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("content type is not JSON: {content_type:?}")]
    InvalidContentType { content_type: Option<String> },

    #[error("payload is not a JSON object: {0}")]
    MalformedBody(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("expected {expected} numeric features: {reason}")]
    InvalidShapeOrType { expected: usize, reason: String },
}

/// Errors raised by the model while predicting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("X has {actual} features, but the classifier is expecting {expected} features as input")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("classifier returned no prediction")]
    EmptyPrediction,

    #[error("classifier returned label {0}, expected 0 or 1")]
    UnexpectedLabel(i64),

    #[error("inference failed: {0}")]
    Model(String),
}

/// Every way a prediction request can fail, as seen by the request handler.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("model unavailable")]
    ModelUnavailable,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PredictError {
    /// Stable classification used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::ModelUnavailable => "model_unavailable",
            PredictError::Validation(ValidationError::InvalidContentType { .. }) => {
                "invalid_content_type"
            }
            PredictError::Validation(ValidationError::MalformedBody(_)) => "malformed_body",
            PredictError::Validation(ValidationError::MissingField(_)) => "missing_field",
            PredictError::Validation(ValidationError::InvalidShapeOrType { .. }) => {
                "invalid_shape_or_type"
            }
            PredictError::Inference(_) => "inference_error",
            PredictError::Internal(_) => "internal_error",
        }
    }

    /// `true` when the caller sent bad input, `false` for service-side failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::Validation(_))
    }
}

/// Result type for artifact loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type for prediction requests.
pub type Result<T> = std::result::Result<T, PredictError>;
