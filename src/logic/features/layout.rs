//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema the model was trained on.**
//!
//! The order below MUST match the column order of the training data.
//! Model artifacts declare their own feature names and are rejected at
//! load time when they disagree with this layout.

use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",      // 0: Age in years
    "sex",      // 1: 1 = male, 0 = female
    "cp",       // 2: Chest pain type (1-4)
    "trestbps", // 3: Resting blood pressure (mmHg)
    "chol",     // 4: Serum cholesterol (mg/dl)
    "fbs",      // 5: Fasting blood sugar > 120 mg/dl
    "restecg",  // 6: Resting ECG category (0-2)
    "thalach",  // 7: Maximum heart rate achieved
    "exang",    // 8: Exercise induced angina
    "oldpeak",  // 9: ST depression induced by exercise
    "slope",    // 10: Slope of the peak exercise ST segment (1-3)
    "ca",       // 11: Number of major vessels (0-3)
    "thal",     // 12: Thalassemia category
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 13;

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information for health/status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a declared feature list doesn't match the layout
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Feature layout mismatch: expected [{}], got [{}]", .expected.join(", "), .actual.join(", "))]
pub struct LayoutMismatchError {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Validate that a declared feature list matches the layout, name for name
pub fn validate_layout<S: AsRef<str>>(names: &[S]) -> Result<(), LayoutMismatchError> {
    let matches = names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a.as_ref() == *b);

    if matches {
        return Ok(());
    }

    Err(LayoutMismatchError {
        expected: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        actual: names.iter().map(|s| s.as_ref().to_string()).collect(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
