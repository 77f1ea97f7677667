//! Decision Threshold Configuration
//!
//! The cut-off applied to the positive-class probability. The default was
//! tuned offline for the shipped model and is kept verbatim.

use serde::{Deserialize, Serialize};

/// Default decision threshold
pub const DEFAULT_THRESHOLD: f64 = 0.5267;

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Threshold used when a request doesn't carry one
    pub base_threshold: f64,

    /// Lowest value the form slider offers
    pub min_threshold: f64,

    /// Highest value the form slider offers
    pub max_threshold: f64,

    /// Slider step; fine enough that the default lies on the grid
    pub step: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            base_threshold: DEFAULT_THRESHOLD,
            min_threshold: 0.1,
            max_threshold: 0.9,
            step: 0.0001,
        }
    }
}

impl ThresholdConfig {
    pub fn new(base: f64) -> Self {
        Self {
            base_threshold: base,
            ..Default::default()
        }
    }

    /// Binary decision; the boundary itself counts as positive
    pub fn classify(threshold: f64, probability: f64) -> u8 {
        if probability >= threshold {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_config() {
        let config = ThresholdConfig::default();
        assert_eq!(config.base_threshold, 0.5267);
        assert_eq!(config.min_threshold, 0.1);
        assert_eq!(config.max_threshold, 0.9);
    }

    #[test]
    fn test_default_threshold_on_slider_grid() {
        // A range input snaps its value to min + k * step
        let config = ThresholdConfig::default();
        for value in [config.base_threshold, config.max_threshold] {
            let steps = (value - config.min_threshold) / config.step;
            assert!((steps - steps.round()).abs() < 1e-6, "{} is {} steps from min", value, steps);
        }
    }

    #[test]
    fn test_classify_inclusive_boundary() {
        assert_eq!(ThresholdConfig::classify(0.5267, 0.5267), 1);
        assert_eq!(ThresholdConfig::classify(0.5267, 0.5266), 0);
        assert_eq!(ThresholdConfig::classify(0.1, 1.0), 1);
        assert_eq!(ThresholdConfig::classify(0.9, 0.0), 0);
    }
}
