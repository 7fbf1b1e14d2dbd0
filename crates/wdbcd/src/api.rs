//! HTTP handlers for the readiness probe and the prediction endpoint.
//!
//! `POST /predict` runs a fixed decision chain and stops at the first
//! failure: readiness, content type, body shape, `"features"` key, feature
//! count and types, then inference. Each failure maps to one status code
//! and one error message.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

use wdbc_core::{
    check_content_type, emit_prediction_error, emit_prediction_served, request_span, validate,
    ClassLabel, ModelService, PredictError, ValidationError,
};

pub const MSG_MODEL_UNAVAILABLE: &str = "Modelo no disponible";
pub const MSG_INVALID_CONTENT_TYPE: &str = "Content-Type debe ser application/json";
pub const MSG_MALFORMED_BODY: &str = "El cuerpo de la solicitud no es un objeto JSON válido";
pub const MSG_MISSING_FEATURES: &str = "Falta la clave \"features\" en los datos de entrada";
pub const MSG_INVALID_FEATURES: &str = "Favor revisar que hayan 30 números reales en features.";

/// Shared state handed to every handler.
pub struct AppState {
    /// Model and readiness, fixed at startup.
    pub service: Arc<ModelService>,
    /// Bounds concurrent CPU-bound predictions.
    pub inference_slots: Semaphore,
}

impl AppState {
    pub fn new(service: ModelService, inference_slots: usize) -> Self {
        Self {
            service: Arc::new(service),
            inference_slots: Semaphore::new(inference_slots.max(1)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: ClassLabel,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A failed prediction request, rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub PredictError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PredictError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictError::ModelUnavailable
            | PredictError::Inference(_)
            | PredictError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller. Validation and readiness failures use
    /// fixed texts; service failures pass the underlying message through.
    pub fn message(&self) -> String {
        match &self.0 {
            PredictError::ModelUnavailable => MSG_MODEL_UNAVAILABLE.to_string(),
            PredictError::Validation(v) => match v {
                ValidationError::InvalidContentType { .. } => MSG_INVALID_CONTENT_TYPE,
                ValidationError::MalformedBody(_) => MSG_MALFORMED_BODY,
                ValidationError::MissingField(_) => MSG_MISSING_FEATURES,
                ValidationError::InvalidShapeOrType { .. } => MSG_INVALID_FEATURES,
            }
            .to_string(),
            PredictError::Inference(e) => e.to_string(),
            PredictError::Internal(msg) => msg.clone(),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        emit_prediction_error(&self.0, status.as_u16());
        let body = ErrorResponse {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// `GET /`: readiness probe.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    if state.service.is_ready() {
        (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "model-missing",
            }),
        )
            .into_response()
    }
}

/// `POST /predict`: classify one feature vector.
///
/// Body rejections (over the size limit, aborted upload) are taken as a
/// value so readiness still wins and the reply stays a JSON error object.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    async move {
        match predict(&state, &headers, &body).await {
            Ok(label) => Json(PredictionResponse { prediction: label }).into_response(),
            Err(err) => ApiError(err).into_response(),
        }
    }
    .instrument(request_span(&request_id, "/predict"))
    .await
}

async fn predict(
    state: &AppState,
    headers: &HeaderMap,
    body: &Result<Bytes, BytesRejection>,
) -> Result<ClassLabel, PredictError> {
    if !state.service.is_ready() {
        return Err(PredictError::ModelUnavailable);
    }

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            check_content_type(content_type)?;
            return Err(ValidationError::MalformedBody(format!(
                "{} ({})",
                rejection.body_text(),
                rejection.status()
            ))
            .into());
        }
    };
    let vector = validate(body, content_type)?;

    let _permit = state
        .inference_slots
        .acquire()
        .await
        .map_err(|e| PredictError::Internal(e.to_string()))?;

    let service = Arc::clone(&state.service);
    let started = Instant::now();
    let label = tokio::task::spawn_blocking(move || service.predict(&vector))
        .await
        .map_err(|e| PredictError::Internal(format!("inference task failed: {e}")))??;

    let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    emit_prediction_served(label, elapsed_us);
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wdbc_core::InferenceError;

    #[test]
    fn validation_errors_are_bad_requests() {
        let cases = [
            (
                ValidationError::InvalidContentType { content_type: None },
                MSG_INVALID_CONTENT_TYPE,
            ),
            (
                ValidationError::MalformedBody("eof".to_string()),
                MSG_MALFORMED_BODY,
            ),
            (ValidationError::MissingField("features"), MSG_MISSING_FEATURES),
            (
                ValidationError::InvalidShapeOrType {
                    expected: 30,
                    reason: "got 2 values".to_string(),
                },
                MSG_INVALID_FEATURES,
            ),
        ];
        for (err, msg) in cases {
            let api = ApiError(err.into());
            assert_eq!(api.status(), StatusCode::BAD_REQUEST);
            assert_eq!(api.message(), msg);
        }
    }

    #[test]
    fn service_errors_are_internal() {
        let api = ApiError(PredictError::ModelUnavailable);
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message(), "Modelo no disponible");

        let api = ApiError(InferenceError::ShapeMismatch { expected: 30, actual: 2 }.into());
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.message().contains("X has 2 features"));

        let api = ApiError(PredictError::Internal("inference task failed: panic".to_string()));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message(), "inference task failed: panic");
    }
}
