//! Model Artifact - loading and validating the trained tree ensemble
//!
//! The artifact is a JSON export of the fitted ensemble using the flat
//! array layout of scikit-learn's `tree_` objects. Everything the
//! inference and attribution code relies on (index bounds, acyclic
//! children, leaf widths) is checked here, once, at startup.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::features::layout::{validate_layout, LayoutMismatchError, FEATURE_COUNT};

/// Artifact format this build understands
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Child index marking a leaf
pub const TREE_LEAF: i64 = -1;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported artifact format version {0} (expected {})", ARTIFACT_FORMAT_VERSION)]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("Model contains no trees")]
    Empty,

    #[error("Tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("Invalid ensemble parameter: {0}")]
    InvalidParameter(String),
}

// ============================================================================
// ON-DISK FORMAT
// ============================================================================

/// One tree as flat node arrays, all indexed by node id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-class weights (random forest) or a single margin (boosting)
    pub value: Vec<Vec<f64>>,
    /// Training weight reaching the node
    pub cover: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnsembleArtifact {
    RandomForest {
        trees: Vec<TreeArrays>,
    },
    GradientBoosting {
        init_score: f64,
        learning_rate: f64,
        trees: Vec<TreeArrays>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    #[serde(flatten)]
    pub ensemble: EnsembleArtifact,
}

// ============================================================================
// IN-MEMORY MODEL
// ============================================================================

/// Validated tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        cover: f64,
    },
    Leaf {
        /// Positive-class probability (forest) or raw margin (boosting)
        value: f64,
        cover: f64,
    },
}

impl Node {
    pub fn cover(&self) -> f64 {
        match self {
            Node::Split { cover, .. } | Node::Leaf { cover, .. } => *cover,
        }
    }
}

/// A binary decision tree; node 0 is the root
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Child taken by `x` at a split; inputs are rounded to f32 like the
    /// exporting library does before comparing
    pub fn goes_left(x: f64, threshold: f64) -> bool {
        f64::from(x as f32) <= threshold
    }

    /// Value of the leaf `x` falls into
    pub fn leaf_value(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value, .. } => return *value,
                Node::Split { feature, threshold, left, right, .. } => {
                    index = if Self::goes_left(x[*feature], *threshold) { *left } else { *right };
                }
            }
        }
    }

    /// Cover-weighted mean leaf value (the prediction with no feature known)
    pub fn expected_value(&self) -> f64 {
        let root_cover = self.nodes[0].cover();
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Leaf { value, cover } => Some(value * cover),
                Node::Split { .. } => None,
            })
            .sum::<f64>()
            / root_cover
    }

    pub fn depth(&self) -> usize {
        fn depth_from(tree: &Tree, index: usize) -> usize {
            match tree.node(index) {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + depth_from(tree, *left).max(depth_from(tree, *right))
                }
            }
        }
        depth_from(self, 0)
    }
}

/// Ensemble kind and its combination rule
#[derive(Debug, Clone, PartialEq)]
pub enum Ensemble {
    /// Leaf values are positive-class probabilities, averaged over trees
    RandomForest { trees: Vec<Tree> },
    /// Leaf values are margins; probability = sigmoid(init + lr * sum)
    GradientBoosting {
        init_score: f64,
        learning_rate: f64,
        trees: Vec<Tree>,
    },
}

impl Ensemble {
    pub fn trees(&self) -> &[Tree] {
        match self {
            Ensemble::RandomForest { trees } | Ensemble::GradientBoosting { trees, .. } => trees,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Ensemble::RandomForest { .. } => "random_forest",
            Ensemble::GradientBoosting { .. } => "gradient_boosting",
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub model_type: String,
    pub tree_count: usize,
    pub max_depth: usize,
    pub features: usize,
    /// SHA-256 of the artifact bytes, hex encoded
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

/// The loaded classifier, shared read-only for the process lifetime
#[derive(Debug, Clone)]
pub struct RiskModel {
    ensemble: Ensemble,
    info: ModelInfo,
}

impl RiskModel {
    /// Load and validate the artifact at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        tracing::info!("Loading model from: {}", path.display());

        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let model = Self::from_bytes(&bytes, &path.display().to_string())?;

        tracing::info!(
            "Model loaded: {} with {} trees (max depth {}), sha256 {}",
            model.info.model_type,
            model.info.tree_count,
            model.info.max_depth,
            model.info.sha256
        );

        Ok(model)
    }

    /// Parse and validate an artifact held in memory
    pub fn from_bytes(bytes: &[u8], source: &str) -> Result<Self, ModelError> {
        let artifact: ArtifactFile = serde_json::from_slice(bytes)?;

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let sha256 = format!("{:x}", hasher.finalize());

        Self::from_artifact(artifact, source, sha256)
    }

    pub fn from_artifact(
        artifact: ArtifactFile,
        source: &str,
        sha256: String,
    ) -> Result<Self, ModelError> {
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion(artifact.format_version));
        }
        validate_layout(&artifact.feature_names)?;

        let ensemble = match artifact.ensemble {
            EnsembleArtifact::RandomForest { trees } => Ensemble::RandomForest {
                trees: build_trees(trees, LeafKind::ClassWeights)?,
            },
            EnsembleArtifact::GradientBoosting { init_score, learning_rate, trees } => {
                if !init_score.is_finite() {
                    return Err(ModelError::InvalidParameter("init_score must be finite".into()));
                }
                if !(learning_rate.is_finite() && learning_rate > 0.0) {
                    return Err(ModelError::InvalidParameter(
                        "learning_rate must be a positive number".into(),
                    ));
                }
                Ensemble::GradientBoosting {
                    init_score,
                    learning_rate,
                    trees: build_trees(trees, LeafKind::Margin)?,
                }
            }
        };

        Ok(Self::new(ensemble, source, sha256))
    }

    /// Wrap an already-validated ensemble
    pub fn new(ensemble: Ensemble, source: &str, sha256: String) -> Self {
        let info = ModelInfo {
            model_path: source.to_string(),
            model_type: ensemble.kind().to_string(),
            tree_count: ensemble.trees().len(),
            max_depth: ensemble.trees().iter().map(Tree::depth).max().unwrap_or(0),
            features: FEATURE_COUNT,
            sha256,
            loaded_at: Utc::now(),
        };
        Self { ensemble, info }
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafKind {
    /// `[w0, w1]`, normalised to the positive-class share
    ClassWeights,
    /// `[margin]`
    Margin,
}

fn build_trees(trees: Vec<TreeArrays>, kind: LeafKind) -> Result<Vec<Tree>, ModelError> {
    if trees.is_empty() {
        return Err(ModelError::Empty);
    }

    trees
        .into_iter()
        .enumerate()
        .map(|(i, arrays)| {
            build_tree(arrays, kind).map_err(|reason| ModelError::MalformedTree { tree: i, reason })
        })
        .collect()
}

fn build_tree(arrays: TreeArrays, kind: LeafKind) -> Result<Tree, String> {
    let n = arrays.children_left.len();
    if n == 0 {
        return Err("no nodes".into());
    }

    let lengths = [
        arrays.children_right.len(),
        arrays.feature.len(),
        arrays.threshold.len(),
        arrays.value.len(),
        arrays.cover.len(),
    ];
    if lengths.iter().any(|&len| len != n) {
        return Err(format!("node arrays differ in length (expected {} nodes)", n));
    }

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        let left = arrays.children_left[i];
        let right = arrays.children_right[i];
        let cover = arrays.cover[i];

        if !(cover.is_finite() && cover > 0.0) {
            return Err(format!("node {}: cover must be a positive number", i));
        }

        if left == TREE_LEAF && right == TREE_LEAF {
            nodes.push(Node::Leaf { value: leaf_value(&arrays.value[i], kind, i)?, cover });
            continue;
        }

        let child = |c: i64| -> Result<usize, String> {
            if c <= i as i64 || c >= n as i64 {
                return Err(format!("node {}: child index {} out of range", i, c));
            }
            Ok(c as usize)
        };
        let left = child(left)?;
        let right = child(right)?;

        let feature = arrays.feature[i];
        if feature < 0 || feature >= FEATURE_COUNT as i64 {
            return Err(format!("node {}: split feature {} out of range", i, feature));
        }

        let threshold = arrays.threshold[i];
        if !threshold.is_finite() {
            return Err(format!("node {}: split threshold is not finite", i));
        }

        nodes.push(Node::Split { feature: feature as usize, threshold, left, right, cover });
    }

    Ok(Tree::from_nodes(nodes))
}

fn leaf_value(value: &[f64], kind: LeafKind, node: usize) -> Result<f64, String> {
    if value.iter().any(|v| !v.is_finite()) {
        return Err(format!("node {}: leaf value is not finite", node));
    }

    match (kind, value) {
        (LeafKind::ClassWeights, [negative, positive]) => {
            let total = negative + positive;
            if *negative < 0.0 || *positive < 0.0 || total <= 0.0 {
                return Err(format!("node {}: leaf class weights must be non-negative and non-zero", node));
            }
            Ok(positive / total)
        }
        (LeafKind::Margin, [margin]) => Ok(*margin),
        (LeafKind::ClassWeights, _) => {
            Err(format!("node {}: expected 2 class weights, got {}", node, value.len()))
        }
        (LeafKind::Margin, _) => {
            Err(format!("node {}: expected 1 margin value, got {}", node, value.len()))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
