//! Domain types for the WDBC inference service.
//!
//! - `FeatureVector`: validated model input
//! - `FeatureMatrix`: input reshaped for a classifier
//! - `ClassLabel`: binary prediction
//! - error taxonomy for loading, validation and inference

pub mod error;
pub mod features;

pub use error::{InferenceError, LoadError, LoadResult, PredictError, Result, ValidationError};
pub use features::{ClassLabel, FeatureMatrix, FeatureVector, FEATURE_COUNT};
