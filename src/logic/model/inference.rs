//! Inference Engine - probability and thresholded label
//!
//! Pure functions of (model, features, threshold): no caching, no
//! counters, nothing mutated.

use serde::{Deserialize, Serialize};

use super::artifact::{Ensemble, ModelInfo, RiskModel};
use super::threshold::ThresholdConfig;
use crate::logic::features::FeatureVector;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 1 = at risk, 0 = healthy
    pub label: u8,
    /// Positive-class probability, 0.0 - 1.0
    pub probability: f64,
    /// Threshold the label was derived with
    pub threshold: f64,
}

impl PredictionResult {
    pub fn is_at_risk(&self) -> bool {
        self.label == 1
    }

    /// Text used in the dashboard and the CSV report
    pub fn outcome_text(&self) -> &'static str {
        if self.is_at_risk() {
            "Likely to have heart disease"
        } else {
            "Unlikely to have heart disease"
        }
    }
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// Anything that yields a positive-class probability for one input
pub trait InferenceEngine {
    fn predict_proba(&self, features: &FeatureVector) -> f64;
    fn info(&self) -> &ModelInfo;
}

impl InferenceEngine for RiskModel {
    fn predict_proba(&self, features: &FeatureVector) -> f64 {
        let x = features.as_array();

        match self.ensemble() {
            Ensemble::RandomForest { trees } => {
                let sum: f64 = trees.iter().map(|tree| tree.leaf_value(x)).sum();
                sum / trees.len() as f64
            }
            Ensemble::GradientBoosting { init_score, learning_rate, trees } => {
                let margin: f64 = trees.iter().map(|tree| tree.leaf_value(x)).sum();
                sigmoid(init_score + learning_rate * margin)
            }
        }
    }

    fn info(&self) -> &ModelInfo {
        RiskModel::info(self)
    }
}

pub fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Probability from the engine, label from the inclusive threshold rule
pub fn predict<E: InferenceEngine + ?Sized>(
    engine: &E,
    features: &FeatureVector,
    threshold: f64,
) -> PredictionResult {
    let probability = engine.predict_proba(features).clamp(0.0, 1.0);
    let label = ThresholdConfig::classify(threshold, probability);

    tracing::debug!(model = %engine.info().model_type, probability, threshold, label, "prediction");

    PredictionResult { label, probability, threshold }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::artifact::tests::stump_json;
    use crate::logic::model::artifact::{Node, Tree};

    /// Engine returning a fixed probability
    struct Fixed(f64, ModelInfo);

    impl InferenceEngine for Fixed {
        fn predict_proba(&self, _: &FeatureVector) -> f64 {
            self.0
        }
        fn info(&self) -> &ModelInfo {
            &self.1
        }
    }

    fn fixed(p: f64) -> Fixed {
        let model = stump_model();
        Fixed(p, model.info().clone())
    }

    fn stump_model() -> RiskModel {
        RiskModel::from_bytes(stump_json().to_string().as_bytes(), "<memory>").unwrap()
    }

    fn features_with_thalach(thalach: f64) -> FeatureVector {
        let mut values = [50.0, 1.0, 1.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 0.0, 1.0, 0.0, 2.0];
        values[7] = thalach;
        FeatureVector::from_values(values)
    }

    #[test]
    fn test_probability_equal_to_threshold_is_positive() {
        let result = predict(&fixed(0.5267), &features_with_thalach(150.0), 0.5267);
        assert_eq!(result.label, 1);
        assert!(result.is_at_risk());
        assert_eq!(result.outcome_text(), "Likely to have heart disease");
    }

    #[test]
    fn test_label_follows_threshold() {
        let engine = fixed(0.6);
        let features = features_with_thalach(150.0);
        for t in [0.1, 0.3, 0.59, 0.6] {
            assert_eq!(predict(&engine, &features, t).label, 1);
        }
        for t in [0.61, 0.75, 0.9] {
            assert_eq!(predict(&engine, &features, t).label, 0);
        }
    }

    #[test]
    fn test_forest_probability_is_leaf_share() {
        let model = stump_model();
        let low = predict(&model, &features_with_thalach(120.0), 0.5267);
        assert!((low.probability - 0.75).abs() < 1e-12);
        assert_eq!(low.label, 1);

        let high = predict(&model, &features_with_thalach(170.0), 0.5267);
        assert!((high.probability - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(high.label, 0);
        assert_eq!(high.outcome_text(), "Unlikely to have heart disease");
    }

    #[test]
    fn test_forest_averages_trees() {
        let leafy = |value| Tree::from_nodes(vec![Node::Leaf { value, cover: 1.0 }]);
        let ensemble = Ensemble::RandomForest { trees: vec![leafy(0.2), leafy(0.4), leafy(0.9)] };
        let model = RiskModel::new(ensemble, "<memory>", String::new());

        let p = model.predict_proba(&features_with_thalach(150.0));
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_boosting_applies_sigmoid() {
        let split = Tree::from_nodes(vec![
            Node::Split { feature: 9, threshold: 1.0, left: 1, right: 2, cover: 10.0 },
            Node::Leaf { value: -1.5, cover: 6.0 },
            Node::Leaf { value: 2.0, cover: 4.0 },
        ]);
        let ensemble = Ensemble::GradientBoosting {
            init_score: 0.0,
            learning_rate: 1.0,
            trees: vec![split],
        };
        let model = RiskModel::new(ensemble, "<memory>", String::new());

        let mut values = *features_with_thalach(150.0).as_array();
        values[9] = 2.5;
        let p = model.predict_proba(&FeatureVector::from_values(values));
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_predict_is_deterministic_and_bounded() {
        let model = stump_model();
        for thalach in [50.0, 100.0, 140.5, 141.0, 220.0] {
            let features = features_with_thalach(thalach);
            let a = predict(&model, &features, 0.5267);
            let b = predict(&model, &features, 0.5267);
            assert_eq!(a, b);
            assert!((0.0..=1.0).contains(&a.probability));
            assert!(a.label <= 1);
            assert_eq!(a.label == 1, a.probability >= 0.5267);
        }
    }
}
