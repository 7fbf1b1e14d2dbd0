//! Request validation for prediction payloads.
//!
//! Turns a raw request body plus its declared content type into a typed
//! [`FeatureVector`], or the first [`ValidationError`] encountered. Checks
//! run in a fixed order:
//!
//! 1. content type declares JSON
//! 2. body parses as a JSON object
//! 3. object has a `"features"` key
//! 4. `"features"` is an array of exactly [`FEATURE_COUNT`] numbers
//!
//! Integers are widened to `f64`; nothing is reordered or normalised.

use serde_json::Value;

use crate::domain::{FeatureVector, ValidationError, FEATURE_COUNT};

/// Key holding the feature array in the request object.
pub const FEATURES_KEY: &str = "features";

/// Returns `true` for `application/json` and `application/*+json` media
/// types, ignoring parameters and case.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.strip_prefix("application/") {
        Some("json") => true,
        Some(subtype) => subtype.len() > "+json".len() && subtype.ends_with("+json"),
        None => false,
    }
}

/// First step of [`validate`], usable on its own when the body could not
/// be read.
///
/// # Errors
///
/// `ValidationError::InvalidContentType` when the header is missing or not
/// JSON.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), ValidationError> {
    if content_type.is_some_and(is_json_content_type) {
        return Ok(());
    }
    Err(ValidationError::InvalidContentType {
        content_type: content_type.map(str::to_string),
    })
}

/// Validate a prediction payload.
///
/// # Errors
///
/// - `ValidationError::InvalidContentType`: header missing or not JSON.
/// - `ValidationError::MalformedBody`: body is not a JSON object.
/// - `ValidationError::MissingField`: no `"features"` key.
/// - `ValidationError::InvalidShapeOrType`: wrong length or a non-numeric
///   element.
pub fn validate(
    body: &[u8],
    content_type: Option<&str>,
) -> Result<FeatureVector, ValidationError> {
    check_content_type(content_type)?;

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;
    let mut object = match payload {
        Value::Object(object) => object,
        other => {
            return Err(ValidationError::MalformedBody(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            )))
        }
    };

    let features = object
        .remove(FEATURES_KEY)
        .ok_or(ValidationError::MissingField(FEATURES_KEY))?;

    parse_features(features)
}

fn parse_features(features: Value) -> Result<FeatureVector, ValidationError> {
    let shape_error = |reason: String| ValidationError::InvalidShapeOrType {
        expected: FEATURE_COUNT,
        reason,
    };

    let items = match features {
        Value::Array(items) => items,
        other => {
            return Err(shape_error(format!(
                "features is {}, not an array",
                json_type_name(&other)
            )))
        }
    };
    if items.len() != FEATURE_COUNT {
        return Err(shape_error(format!("got {} values", items.len())));
    }

    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| shape_error(format!("element {i} is not representable as f64"))),
            other => Err(shape_error(format!(
                "element {i} is {}, not a number",
                json_type_name(other)
            ))),
        })
        .collect::<Result<Vec<f64>, _>>()?;

    FeatureVector::new(values).ok_or_else(|| shape_error("non-finite value".to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
