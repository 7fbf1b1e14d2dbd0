//! WDBC Core Library
//!
//! Loads a pre-trained breast-cancer classifier artifact and answers
//! single-vector predictions against it. The HTTP surface lives in the
//! `wdbcd` crate; everything here is transport-agnostic.

pub mod artifact;
pub mod domain;
pub mod executor;
pub mod obs;
pub mod service;
pub mod telemetry;
pub mod validation;

pub use artifact::{
    load as load_artifact, ArtifactDigest, ArtifactInfo, Classifier, LoadedArtifact, RandomForest,
};

pub use domain::{
    ClassLabel, FeatureMatrix, FeatureVector, InferenceError, LoadError, PredictError, Result,
    ValidationError, FEATURE_COUNT,
};

pub use obs::{
    emit_artifact_load_failed, emit_artifact_loaded, emit_artifact_missing,
    emit_prediction_error, emit_prediction_served, emit_server_listening, emit_server_shutdown,
    request_span,
};

pub use service::{ModelService, ReadinessState};
pub use telemetry::{init_tracing, LogFormat};
pub use validation::{check_content_type, is_json_content_type, validate};
