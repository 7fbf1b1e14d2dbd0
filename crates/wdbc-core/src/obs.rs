//! Structured observability hooks for the artifact and request lifecycle.
//!
//! Every event carries a stable `event` field so log pipelines can filter on
//! it regardless of the message text:
//!
//! - `artifact.loaded`, `artifact.missing`, `artifact.load_failed`
//! - `predict.served`, `predict.rejected`, `predict.failed`
//! - `server.listening`, `server.shutdown`

use std::net::SocketAddr;
use std::path::Path;

use tracing::{error, info, warn};

use crate::artifact::ArtifactInfo;
use crate::domain::{ClassLabel, LoadError, PredictError};

/// Span covering one HTTP request; attach with `tracing::Instrument`.
pub fn request_span(request_id: &str, route: &'static str) -> tracing::Span {
    tracing::info_span!("wdbc.request", request_id = %request_id, route = route)
}

/// Emit event: artifact loaded and validated.
pub fn emit_artifact_loaded(info: &ArtifactInfo) {
    info!(
        event = "artifact.loaded",
        path = %info.path.display(),
        digest = %info.digest,
        size_bytes = info.size_bytes,
        n_trees = info.n_trees,
        n_features = info.n_features,
        "model artifact loaded"
    );
}

/// Emit event: no artifact at the configured path (warning level).
pub fn emit_artifact_missing(path: &Path) {
    warn!(
        event = "artifact.missing",
        path = %path.display(),
        "model artifact not found, serving degraded"
    );
}

/// Emit event: artifact present but unusable (error level).
pub fn emit_artifact_load_failed(path: &Path, error: &LoadError) {
    error!(
        event = "artifact.load_failed",
        path = %path.display(),
        error = %error,
        "could not load model artifact, serving degraded"
    );
}

/// Emit event: prediction returned to the caller.
pub fn emit_prediction_served(label: ClassLabel, elapsed_us: u64) {
    info!(
        event = "predict.served",
        prediction = label.value(),
        elapsed_us = elapsed_us,
        "prediction served"
    );
}

/// Emit event: request ended with an error response.
///
/// Client input errors log at `warn` as `predict.rejected`; service-side
/// failures log at `error` as `predict.failed`.
pub fn emit_prediction_error(err: &PredictError, status: u16) {
    if err.is_client_error() {
        warn!(
            event = "predict.rejected",
            kind = err.kind(),
            status = status,
            error = %err,
        );
    } else {
        error!(
            event = "predict.failed",
            kind = err.kind(),
            status = status,
            error = %err,
        );
    }
}

/// Emit event: HTTP listener bound.
pub fn emit_server_listening(addr: SocketAddr, ready: bool) {
    info!(event = "server.listening", addr = %addr, ready = ready, "server listening");
}

/// Emit event: shutdown signal received, draining connections.
pub fn emit_server_shutdown(signal: &str) {
    info!(event = "server.shutdown", signal = signal, "shutting down");
}
