//! Random-forest classifier deserialized from the JSON artifact.
//!
//! Each tree is stored as the flat parallel arrays a fitted scikit-learn
//! `DecisionTreeClassifier.tree_` exposes (`children_left`, `children_right`,
//! `feature`, `threshold`, `value`), so a trained forest can be exported
//! without any conversion step. Prediction averages per-tree class
//! probabilities and picks the arg-max class, matching scikit-learn's soft
//! voting.

use serde::Deserialize;

use crate::domain::{FeatureMatrix, InferenceError, LoadError, LoadResult};

use super::Classifier;

/// Format tag expected in the artifact's `format` field.
pub const FORMAT_V1: &str = "random-forest/v1";

/// Child index marking a leaf in the `children_left`/`children_right` arrays.
const LEAF: i64 = -1;

#[derive(Debug, Deserialize)]
struct ForestDocument {
    format: String,
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<TreeDocument>,
}

#[derive(Debug, Deserialize)]
struct TreeDocument {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        proba: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Route `row` to a leaf and return that leaf's class probabilities.
    ///
    /// Terminates because every split points strictly forward.
    fn leaf_proba(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Immutable random-forest model.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Parse and validate an artifact document.
    ///
    /// # Errors
    ///
    /// - `LoadError::Parse`: the bytes are not a JSON forest document.
    /// - `LoadError::UnsupportedFormat`: `format` is not [`FORMAT_V1`].
    /// - `LoadError::Corrupt`: the trees are structurally inconsistent.
    pub fn from_slice(bytes: &[u8]) -> LoadResult<Self> {
        let doc: ForestDocument = serde_json::from_slice(bytes)?;
        if doc.format != FORMAT_V1 {
            return Err(LoadError::UnsupportedFormat(doc.format));
        }
        if doc.n_features == 0 {
            return Err(LoadError::Corrupt("n_features must be positive".to_string()));
        }
        if doc.classes.is_empty() {
            return Err(LoadError::Corrupt("classes must not be empty".to_string()));
        }
        for (i, class) in doc.classes.iter().enumerate() {
            if doc.classes[..i].contains(class) {
                return Err(LoadError::Corrupt(format!("duplicate class label {class}")));
            }
        }
        if doc.trees.is_empty() {
            return Err(LoadError::Corrupt("forest has no trees".to_string()));
        }

        let trees = doc
            .trees
            .into_iter()
            .enumerate()
            .map(|(t, tree)| build_tree(t, tree, doc.n_features, doc.classes.len()))
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(Self {
            n_features: doc.n_features,
            classes: doc.classes,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Mean class probabilities across all trees for one row.
    pub fn predict_proba_row(&self, row: &[f64]) -> Vec<f64> {
        let mut acc = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (sum, p) in acc.iter_mut().zip(tree.leaf_proba(row)) {
                *sum += p;
            }
        }
        let n = self.trees.len() as f64;
        acc.iter_mut().for_each(|p| *p /= n);
        acc
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, input: &FeatureMatrix) -> Result<Vec<i64>, InferenceError> {
        if input.cols() != self.n_features {
            return Err(InferenceError::ShapeMismatch {
                expected: self.n_features,
                actual: input.cols(),
            });
        }
        Ok(input
            .iter_rows()
            .map(|row| {
                let proba = self.predict_proba_row(row);
                // first maximum wins on ties
                let best = proba
                    .iter()
                    .enumerate()
                    .fold(0, |best, (i, p)| if *p > proba[best] { i } else { best });
                self.classes[best]
            })
            .collect())
    }
}

fn build_tree(
    t: usize,
    doc: TreeDocument,
    n_features: usize,
    n_classes: usize,
) -> LoadResult<DecisionTree> {
    let n = doc.children_left.len();
    if n == 0 {
        return Err(LoadError::Corrupt(format!("tree {t} has no nodes")));
    }
    if doc.children_right.len() != n
        || doc.feature.len() != n
        || doc.threshold.len() != n
        || doc.value.len() != n
    {
        return Err(LoadError::Corrupt(format!(
            "tree {t} has mismatched array lengths"
        )));
    }

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        let corrupt = |msg: &str| LoadError::Corrupt(format!("tree {t} node {i}: {msg}"));
        let (left, right) = (doc.children_left[i], doc.children_right[i]);

        if left == LEAF {
            if right != LEAF {
                return Err(corrupt("leaf has a right child"));
            }
            let counts = &doc.value[i];
            if counts.len() != n_classes {
                return Err(corrupt("value row does not match class count"));
            }
            if counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
                return Err(corrupt("value row has negative or non-finite entries"));
            }
            let total: f64 = counts.iter().sum();
            if total <= 0.0 {
                return Err(corrupt("leaf has zero total weight"));
            }
            nodes.push(Node::Leaf {
                proba: counts.iter().map(|c| c / total).collect(),
            });
            continue;
        }

        let child = |c: i64| -> Option<usize> {
            usize::try_from(c).ok().filter(|&c| c > i && c < n)
        };
        let (Some(left), Some(right)) = (child(left), child(right)) else {
            return Err(corrupt("child index must point forward within the tree"));
        };
        let feature = usize::try_from(doc.feature[i])
            .ok()
            .filter(|&f| f < n_features)
            .ok_or_else(|| corrupt("feature index out of range"))?;
        let threshold = doc.threshold[i];
        if !threshold.is_finite() {
            return Err(corrupt("threshold is not finite"));
        }
        nodes.push(Node::Split {
            feature,
            threshold,
            left,
            right,
        });
    }

    Ok(DecisionTree { nodes })
}
