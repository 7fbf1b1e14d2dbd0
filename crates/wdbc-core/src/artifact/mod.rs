//! Artifact store: reads the classifier artifact from disk once and exposes
//! it behind the [`Classifier`] capability.

pub mod forest;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureMatrix, InferenceError, LoadError, LoadResult, FEATURE_COUNT};

pub use forest::{RandomForest, FORMAT_V1};

/// Prediction capability of a loaded model.
pub trait Classifier: Send + Sync {
    /// Number of columns the model expects per row.
    fn n_features(&self) -> usize;

    /// Predict one label per input row.
    fn predict(&self, input: &FeatureMatrix) -> Result<Vec<i64>, InferenceError>;
}

/// SHA-256 of the artifact bytes, used to identify which model is served.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactDigest([u8; 32]);

impl ArtifactDigest {
    pub fn compute(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ArtifactDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ArtifactDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactDigest({})", &self.to_hex()[..12])
    }
}

impl Serialize for ArtifactDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Descriptive metadata about a loaded artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub format: &'static str,
    pub digest: ArtifactDigest,
    pub size_bytes: usize,
    pub n_trees: usize,
    pub n_features: usize,
    pub classes: Vec<i64>,
}

/// A model together with the metadata of the file it came from.
pub struct LoadedArtifact {
    pub model: Arc<dyn Classifier>,
    pub info: ArtifactInfo,
}

impl fmt::Debug for LoadedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedArtifact")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Load and validate the artifact at `path`.
///
/// Besides structural validation of the forest, the artifact must be
/// compatible with the serving schema: exactly [`FEATURE_COUNT`] features
/// and class labels drawn from {0, 1}.
///
/// # Errors
///
/// - `LoadError::NotFound`: nothing exists at `path`.
/// - `LoadError::Io`: the file exists but cannot be read.
/// - `LoadError::Parse` / `UnsupportedFormat` / `Corrupt`: see
///   [`RandomForest::from_slice`].
/// - `LoadError::Incompatible`: valid forest, wrong schema.
pub fn load(path: &Path) -> LoadResult<LoadedArtifact> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let digest = ArtifactDigest::compute(&bytes);
    let forest = RandomForest::from_slice(&bytes)?;

    if forest.n_features() != FEATURE_COUNT {
        return Err(LoadError::Incompatible(format!(
            "artifact expects {} features, service schema has {}",
            forest.n_features(),
            FEATURE_COUNT
        )));
    }
    if let Some(label) = forest.classes().iter().find(|c| !matches!(c, 0 | 1)) {
        return Err(LoadError::Incompatible(format!(
            "class label {label} is not binary"
        )));
    }

    let info = ArtifactInfo {
        path: path.to_path_buf(),
        format: FORMAT_V1,
        digest,
        size_bytes: bytes.len(),
        n_trees: forest.n_trees(),
        n_features: forest.n_features(),
        classes: forest.classes().to_vec(),
    };

    Ok(LoadedArtifact {
        model: Arc::new(forest),
        info,
    })
}
