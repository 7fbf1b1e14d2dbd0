//! Inference executor: one validated vector in, one label out.

use crate::artifact::Classifier;
use crate::domain::{ClassLabel, FeatureMatrix, FeatureVector, InferenceError};

/// Reshape `vector` into a `1 × n` matrix, run the model and convert the
/// single returned label.
///
/// # Errors
///
/// Propagates the model's `InferenceError`, and fails with
/// `EmptyPrediction` / `UnexpectedLabel` when the output is not a single
/// binary label.
pub fn execute(model: &dyn Classifier, vector: &FeatureVector) -> Result<ClassLabel, InferenceError> {
    let input = FeatureMatrix::single_row(vector);
    let labels = model.predict(&input)?;
    let first = labels.first().copied().ok_or(InferenceError::EmptyPrediction)?;
    ClassLabel::try_from(first)
}
