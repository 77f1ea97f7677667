//! Feature Vector - Core data structure for model input
//!
//! Built only through [`FeatureVector::encode`] (or raw values in tests),
//! so the ordering always follows `FEATURE_LAYOUT`.

use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};
use crate::models::{Categorical, PatientForm};

/// Encoded model input in `FEATURE_LAYOUT` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values already in layout order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Encode a form submission, replacing categorical labels by their codes
    pub fn encode(form: &PatientForm) -> Self {
        Self::from_values([
            f64::from(form.age),
            f64::from(form.sex.code()),
            f64::from(form.cp.code()),
            form.trestbps,
            form.chol,
            f64::from(form.fbs.code()),
            f64::from(form.restecg.code()),
            f64::from(form.thalach),
            f64::from(form.exang.code()),
            form.oldpeak,
            f64::from(form.slope.code()),
            f64::from(form.ca),
            f64::from(form.thal.code()),
        ])
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Named values, in layout order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: serde_json::Map<String, serde_json::Value> = self
            .named()
            .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
            .collect();
        serde_json::Value::Object(named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChestPain, RestingEcg, Sex, StSlope, Thalassemia, YesNo};

    fn scenario_form() -> PatientForm {
        PatientForm {
            age: 50,
            sex: Sex::Male,
            cp: ChestPain::TypicalAngina,
            trestbps: 120.0,
            chol: 200.0,
            fbs: YesNo::No,
            restecg: RestingEcg::Normal,
            thalach: 150,
            exang: YesNo::No,
            oldpeak: 0.0,
            slope: StSlope::Upsloping,
            ca: 0,
            thal: Thalassemia::Normal,
            threshold: 0.5267,
        }
    }

    #[test]
    fn test_encode_reference_patient() {
        let vector = FeatureVector::encode(&scenario_form());
        assert_eq!(
            vector.as_slice(),
            &[50.0, 1.0, 1.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 0.0, 1.0, 0.0, 2.0]
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let form = PatientForm {
            sex: Sex::Female,
            cp: ChestPain::Asymptomatic,
            restecg: RestingEcg::LeftVentricularHypertrophy,
            slope: StSlope::Downsloping,
            thal: Thalassemia::ReversibleDefect,
            ca: 3,
            ..scenario_form()
        };
        let a = FeatureVector::encode(&form);
        let b = FeatureVector::encode(&form);
        assert_eq!(a, b);
        let values = a.as_array();
        assert_eq!(values[1], 0.0);
        assert_eq!(values[2], 4.0);
        assert_eq!(values[6], 2.0);
        assert_eq!(values[10], 3.0);
        assert_eq!(values[11], 3.0);
        assert_eq!(values[12], 3.0);
    }

    #[test]
    fn test_log_entry_names_every_feature() {
        let entry = FeatureVector::encode(&scenario_form()).to_log_entry();
        let object = entry.as_object().unwrap();
        assert_eq!(object.len(), FEATURE_COUNT);
        assert_eq!(object["thalach"], serde_json::json!(150.0));
    }
}
