//! Model Module - tree ensemble loading and inference
//!
//! The artifact is loaded once at startup and shared read-only.

pub mod artifact;
pub mod inference;
pub mod threshold;

// Re-export common types
pub use artifact::{Ensemble, ModelError, ModelInfo, Node, RiskModel, Tree};
pub use inference::{predict, InferenceEngine, PredictionResult};
pub use threshold::{ThresholdConfig, DEFAULT_THRESHOLD};
