//! Explain Module - per-prediction feature attribution

pub mod engine;
pub mod types;

pub use engine::TreeExplainer;
pub use types::{AttributionMap, Explanation, FeatureContribution, ShapValues};

use crate::logic::features::FeatureVector;
use crate::logic::model::RiskModel;

/// Attribution magnitudes for one input
pub fn explain(model: &RiskModel, features: &FeatureVector) -> AttributionMap {
    TreeExplainer::new(model).explain(features)
}
