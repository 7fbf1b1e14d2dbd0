//! Typed model inputs and outputs.

use std::fmt;

use serde::Serialize;

use super::error::InferenceError;

/// Number of features the serving schema accepts per prediction.
pub const FEATURE_COUNT: usize = 30;

/// Exactly [`FEATURE_COUNT`] finite reals, in training column order.
///
/// Only the validator constructs these from untrusted input, so any value
/// of this type already satisfies the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Build a vector, returning `None` unless it has the expected length and
    /// every element is finite.
    pub fn new(values: Vec<f64>) -> Option<Self> {
        if values.len() != FEATURE_COUNT || !values.iter().all(|v| v.is_finite()) {
            return None;
        }
        Some(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Row-major matrix handed to a classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Reshape a single vector into a `1 × n` matrix.
    pub fn single_row(vector: &FeatureVector) -> Self {
        let data = vector.as_slice().to_vec();
        Self {
            rows: 1,
            cols: data.len(),
            data,
        }
    }

    /// Build a matrix from raw row-major data. Returns `None` when
    /// `data.len() != rows * cols`.
    pub fn from_rows(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if rows.checked_mul(cols)? != data.len() {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics; a zero-column matrix has no meaningful rows
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }
}

/// Binary class label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClassLabel(u8);

impl ClassLabel {
    pub const NEGATIVE: ClassLabel = ClassLabel(0);
    pub const POSITIVE: ClassLabel = ClassLabel(1);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ClassLabel {
    type Error = InferenceError;

    fn try_from(raw: i64) -> std::result::Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::NEGATIVE),
            1 => Ok(Self::POSITIVE),
            other => Err(InferenceError::UnexpectedLabel(other)),
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
