//! Assessment model
//!
//! Everything derived for one form submission. Built per request and
//! dropped after rendering.

use serde::Serialize;

use crate::logic::explain::AttributionMap;
use crate::logic::features::FeatureVector;
use crate::logic::model::PredictionResult;
use crate::logic::narrative::{ConfidenceLevel, HeartAge, Summary};

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub features: FeatureVector,
    pub prediction: PredictionResult,
    pub outcome: &'static str,
    pub confidence: ConfidenceLevel,
    pub summary: Summary,
    pub heart_age: HeartAge,
    pub attribution: AttributionMap,
    pub health_tips: Vec<String>,
}
