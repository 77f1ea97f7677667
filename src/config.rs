//! Configuration module

use std::env;

use crate::logic::model::ThresholdConfig;
use crate::logic::narrative::HeartAgeCoefficients;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Path of the trained model artifact
    pub model_path: String,

    /// Decision threshold defaults and slider range
    pub threshold: ThresholdConfig,

    /// Heart-age formula coefficients
    pub heart_age: HeartAgeCoefficients,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            model_path: "models/heart_disease_rf_model.json".to_string(),
            threshold: ThresholdConfig::default(),
            heart_age: HeartAgeCoefficients::default(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_threshold =
            threshold_from(env::var("DEFAULT_THRESHOLD").ok().as_deref(), &defaults.threshold);

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH").unwrap_or(defaults.model_path),

            threshold: ThresholdConfig::new(base_threshold),

            heart_age: defaults.heart_age,

            environment: environment(),
        }
    }
}

/// Deployment environment (development, production)
pub fn environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// Check if an environment name means production
pub fn is_production(environment: &str) -> bool {
    environment == "production"
}

/// Decision threshold from its raw setting; unusable values fall back to the default
fn threshold_from(raw: Option<&str>, defaults: &ThresholdConfig) -> f64 {
    let Some(raw) = raw else {
        return defaults.base_threshold;
    };

    match raw.trim().parse::<f64>() {
        Ok(t) if (defaults.min_threshold..=defaults.max_threshold).contains(&t) => t,
        _ => {
            tracing::warn!(
                "Ignoring DEFAULT_THRESHOLD={:?}: expected a number in {}..={}, using {}",
                raw,
                defaults.min_threshold,
                defaults.max_threshold,
                defaults.base_threshold
            );
            defaults.base_threshold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.threshold.base_threshold, 0.5267);
        assert_eq!(config.heart_age, HeartAgeCoefficients::default());
        assert!(!is_production(&config.environment));
        assert!(is_production("production"));
    }

    #[test]
    fn test_threshold_setting_fallback() {
        let defaults = ThresholdConfig::default();
        assert_eq!(threshold_from(None, &defaults), 0.5267);
        assert_eq!(threshold_from(Some("0.4"), &defaults), 0.4);
        assert_eq!(threshold_from(Some(" 0.9 "), &defaults), 0.9);

        for bad in ["1.5", "0.05", "abc", "NaN", ""] {
            assert_eq!(threshold_from(Some(bad), &defaults), 0.5267, "{:?}", bad);
        }
    }
}
