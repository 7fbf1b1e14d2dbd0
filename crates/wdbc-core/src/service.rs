//! Process-wide model service: the artifact (if it loaded) plus the
//! readiness flag derived from that load.
//!
//! Constructed once at startup and shared read-only afterwards, so request
//! handlers never need a lock.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::artifact::{self, ArtifactInfo, Classifier, LoadedArtifact};
use crate::domain::{ClassLabel, FeatureVector, LoadError, PredictError, Result};
use crate::{executor, obs};

/// Whether the service can answer predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessState {
    Ready,
    Unavailable,
}

/// Loaded model and readiness, fixed for the lifetime of the process.
pub struct ModelService {
    model: Option<Arc<dyn Classifier>>,
    artifact: Option<ArtifactInfo>,
}

impl ModelService {
    /// Load the artifact at `path`, falling back to an unavailable service
    /// when loading fails. Never fails itself: a missing or broken artifact
    /// degrades the service instead of aborting startup.
    pub fn initialize(path: &Path) -> Self {
        match artifact::load(path) {
            Ok(loaded) => {
                obs::emit_artifact_loaded(&loaded.info);
                Self::from_loaded(loaded)
            }
            Err(LoadError::NotFound { path }) => {
                obs::emit_artifact_missing(&path);
                Self::unavailable()
            }
            Err(err) => {
                obs::emit_artifact_load_failed(path, &err);
                Self::unavailable()
            }
        }
    }

    pub fn from_loaded(loaded: LoadedArtifact) -> Self {
        Self {
            model: Some(loaded.model),
            artifact: Some(loaded.info),
        }
    }

    /// Ready service around an in-memory model with no artifact metadata.
    pub fn with_model(model: Arc<dyn Classifier>) -> Self {
        Self {
            model: Some(model),
            artifact: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            model: None,
            artifact: None,
        }
    }

    pub fn readiness(&self) -> ReadinessState {
        if self.model.is_some() {
            ReadinessState::Ready
        } else {
            ReadinessState::Unavailable
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness() == ReadinessState::Ready
    }

    /// Metadata of the served artifact, when one was loaded from disk.
    pub fn artifact(&self) -> Option<&ArtifactInfo> {
        self.artifact.as_ref()
    }

    /// Predict the label for an already validated vector.
    ///
    /// # Errors
    ///
    /// `PredictError::ModelUnavailable` when no model is loaded, otherwise
    /// the executor's `InferenceError`.
    pub fn predict(&self, vector: &FeatureVector) -> Result<ClassLabel> {
        let model = self.model.as_deref().ok_or(PredictError::ModelUnavailable)?;
        Ok(executor::execute(model, vector)?)
    }
}

impl fmt::Debug for ModelService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelService")
            .field("readiness", &self.readiness())
            .field("artifact", &self.artifact)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureMatrix, InferenceError, FEATURE_COUNT};

    struct AlwaysPositive;

    impl Classifier for AlwaysPositive {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict(&self, input: &FeatureMatrix) -> std::result::Result<Vec<i64>, InferenceError> {
            Ok(vec![1; input.rows()])
        }
    }

    #[test]
    fn unavailable_service_refuses_predictions() {
        let service = ModelService::unavailable();
        assert_eq!(service.readiness(), ReadinessState::Unavailable);
        assert!(!service.is_ready());

        let vector = FeatureVector::new(vec![0.0; FEATURE_COUNT]).unwrap();
        assert!(matches!(
            service.predict(&vector),
            Err(PredictError::ModelUnavailable)
        ));
    }

    #[test]
    fn ready_service_predicts() {
        let service = ModelService::with_model(Arc::new(AlwaysPositive));
        assert!(service.is_ready());
        assert!(service.artifact().is_none());

        let vector = FeatureVector::new(vec![0.0; FEATURE_COUNT]).unwrap();
        assert_eq!(service.predict(&vector).unwrap(), ClassLabel::POSITIVE);
    }

    #[test]
    fn initialize_with_missing_file_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let service = ModelService::initialize(&dir.path().join("modelo_cancer.json"));
        assert_eq!(service.readiness(), ReadinessState::Unavailable);
    }

    #[test]
    fn readiness_serializes_kebab_case() {
        let json = serde_json::to_string(&ReadinessState::Unavailable).unwrap();
        assert_eq!(json, "\"unavailable\"");
    }
}
