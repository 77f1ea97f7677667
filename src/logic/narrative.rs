//! Narrative - rule-based text derived from inputs and prediction
//!
//! Confidence label, summary, heart-age estimate and health tips. All
//! fixed threshold rules; nothing here is learned.

use serde::{Deserialize, Serialize};

use crate::logic::model::PredictionResult;
use crate::models::{PatientForm, YesNo};

/// Cholesterol above this is flagged (mg/dl)
pub const HIGH_CHOLESTEROL: f64 = 240.0;
/// Resting blood pressure above this is flagged (mmHg)
pub const HIGH_BLOOD_PRESSURE: f64 = 130.0;
/// Max heart rate below this is flagged (bpm)
pub const LOW_HEART_RATE: i32 = 100;

// ============================================================================
// CONFIDENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryHigh,
    Moderate,
    Low,
}

impl ConfidenceLevel {
    /// Banded on probability alone, independent of the label
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.85 {
            ConfidenceLevel::VeryHigh
        } else if probability >= 0.65 {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryHigh => "🚨 Very High Confidence",
            ConfidenceLevel::Moderate => "⚠️ Moderate Confidence",
            ConfidenceLevel::Low => "✅ Low Confidence",
        }
    }
}

// ============================================================================
// HEART AGE
// ============================================================================

/// Heart-age formula coefficients, tuned offline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartAgeCoefficients {
    /// Years per mg/dl of cholesterol above 200
    pub cholesterol: f64,
    /// Years per mmHg of resting BP above 120
    pub blood_pressure: f64,
    /// Years per unit of ST depression
    pub oldpeak: f64,
    /// Years per bpm of max heart rate above 100 (subtracted)
    pub heart_rate: f64,
}

impl Default for HeartAgeCoefficients {
    fn default() -> Self {
        Self {
            cholesterol: 0.05,
            blood_pressure: 0.05,
            oldpeak: 2.0,
            heart_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartAgeColor {
    Green,
    Orange,
    Red,
}

impl HeartAgeColor {
    pub fn css(&self) -> &'static str {
        match self {
            HeartAgeColor::Green => "green",
            HeartAgeColor::Orange => "orange",
            HeartAgeColor::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartAge {
    pub years: i64,
    pub color: HeartAgeColor,
}

impl HeartAge {
    /// Truncated toward zero, never below the actual age
    pub fn estimate(form: &PatientForm, k: &HeartAgeCoefficients) -> Self {
        let age = i64::from(form.age);
        let raw = f64::from(form.age)
            + (form.chol - 200.0) * k.cholesterol
            + (form.trestbps - 120.0) * k.blood_pressure
            + form.oldpeak * k.oldpeak
            - (f64::from(form.thalach) - 100.0) * k.heart_rate;

        let years = age.max(raw.trunc() as i64);
        let excess = years - age;
        let color = if excess <= 0 {
            HeartAgeColor::Green
        } else if excess <= 5 {
            HeartAgeColor::Orange
        } else {
            HeartAgeColor::Red
        };

        Self { years, color }
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub tone: String,
    pub risk_note: String,
    pub cholesterol_note: String,
    pub blood_pressure_note: String,
}

impl Summary {
    pub fn generate(form: &PatientForm, prediction: &PredictionResult) -> Self {
        let tone = if prediction.is_at_risk() {
            "⚠️ Based on the values entered, there's an elevated risk of heart disease."
        } else {
            "✅ Your inputs suggest a low risk of heart disease. Keep maintaining a healthy lifestyle!"
        };

        let risk_note = format!(
            "Your calculated risk score is {:.2}%, which helps understand the model's confidence in its prediction.",
            prediction.probability * 100.0
        );

        let cholesterol_note = if form.chol > HIGH_CHOLESTEROL {
            "High cholesterol may be a concern."
        } else {
            "Your cholesterol level seems within normal limits."
        };

        let blood_pressure_note = if form.trestbps > HIGH_BLOOD_PRESSURE {
            "Your blood pressure is slightly high."
        } else {
            "Your blood pressure seems fine."
        };

        Self {
            tone: tone.to_string(),
            risk_note,
            cholesterol_note: cholesterol_note.to_string(),
            blood_pressure_note: blood_pressure_note.to_string(),
        }
    }
}

// ============================================================================
// HEALTH TIPS
// ============================================================================

const AT_RISK_TIPS: &[&str] = &[
    "🚭 Quit smoking if you do.",
    "🥗 Adopt a heart-healthy diet.",
    "🏃‍♂️ Exercise regularly.",
    "🧘 Manage stress.",
    "💊 Consult a doctor for treatment.",
];

const HEALTHY_TIPS: &[&str] = &[
    "✅ Great! Keep a healthy lifestyle.",
    "🥗 Eat balanced diet.",
    "🩺 Regular check-ups.",
];

pub const TIP_HIGH_CHOLESTEROL: &str = "⚠️ High cholesterol. Reduce fatty foods.";
pub const TIP_HIGH_BLOOD_PRESSURE: &str = "⚠️ High BP. Lower salt intake.";
pub const TIP_HIGH_SUGAR: &str = "⚠️ High fasting sugar. Avoid sugary foods.";
pub const TIP_LOW_HEART_RATE: &str = "⚠️ Low heart rate. Consult cardiologist.";

/// Base list for the label, then conditional warnings in fixed order
pub fn health_tips(form: &PatientForm, prediction: &PredictionResult) -> Vec<String> {
    let base = if prediction.is_at_risk() { AT_RISK_TIPS } else { HEALTHY_TIPS };
    let mut tips: Vec<String> = base.iter().map(|tip| tip.to_string()).collect();

    if form.chol > HIGH_CHOLESTEROL {
        tips.push(TIP_HIGH_CHOLESTEROL.to_string());
    }
    if form.trestbps > HIGH_BLOOD_PRESSURE {
        tips.push(TIP_HIGH_BLOOD_PRESSURE.to_string());
    }
    if form.fbs == YesNo::Yes {
        tips.push(TIP_HIGH_SUGAR.to_string());
    }
    if form.thalach < LOW_HEART_RATE {
        tips.push(TIP_LOW_HEART_RATE.to_string());
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_form() -> PatientForm {
        PatientForm { fbs: YesNo::No, exang: YesNo::No, ..PatientForm::default() }
    }

    fn prediction(label: u8, probability: f64) -> PredictionResult {
        PredictionResult { label, probability, threshold: 0.5267 }
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceLevel::from_probability(0.85), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_probability(0.849), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_probability(0.65), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_probability(0.64), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_probability(0.0), ConfidenceLevel::Low);
    }

    #[test]
    fn test_heart_age_clamped_to_age() {
        // 50 + 0 + 0 + 0 - 5 = 45, floored at 50
        let heart = HeartAge::estimate(&reference_form(), &HeartAgeCoefficients::default());
        assert_eq!(heart.years, 50);
        assert_eq!(heart.color, HeartAgeColor::Green);
    }

    #[test]
    fn test_heart_age_thalach_offsets_cholesterol() {
        // +5 for cholesterol, -5 for thalach 150
        let form = PatientForm { chol: 300.0, ..reference_form() };
        let heart = HeartAge::estimate(&form, &HeartAgeCoefficients::default());
        assert_eq!(heart.years, 50);
        assert_eq!(heart.color, HeartAgeColor::Green);
    }

    #[test]
    fn test_heart_age_orange_boundary() {
        let form = PatientForm { chol: 300.0, thalach: 100, ..reference_form() };
        let heart = HeartAge::estimate(&form, &HeartAgeCoefficients::default());
        assert_eq!(heart.years, 55);
        assert_eq!(heart.color, HeartAgeColor::Orange);
    }

    #[test]
    fn test_heart_age_red() {
        let form = PatientForm { chol: 300.0, thalach: 100, oldpeak: 1.0, ..reference_form() };
        let heart = HeartAge::estimate(&form, &HeartAgeCoefficients::default());
        assert_eq!(heart.years, 57);
        assert_eq!(heart.color, HeartAgeColor::Red);
    }

    #[test]
    fn test_heart_age_truncates() {
        // 50 + 0.05 * 30 = 51.5 -> 51 with thalach at 100
        let form = PatientForm { chol: 230.0, thalach: 100, ..reference_form() };
        let heart = HeartAge::estimate(&form, &HeartAgeCoefficients::default());
        assert_eq!(heart.years, 51);
    }

    #[test]
    fn test_heart_age_never_below_age() {
        let k = HeartAgeCoefficients::default();
        for age in [5, 30, 64, 99] {
            for chol in [0.0, 150.0, 400.0] {
                for trestbps in [0.0, 120.0, 200.0] {
                    for oldpeak in [-3.0, 0.0, 6.2] {
                        for thalach in [50, 150, 220] {
                            let form = PatientForm {
                                age,
                                chol,
                                trestbps,
                                oldpeak,
                                thalach,
                                ..reference_form()
                            };
                            assert!(HeartAge::estimate(&form, &k).years >= i64::from(age));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_tips_all_conditional_warnings() {
        let form = PatientForm {
            fbs: YesNo::Yes,
            chol: 250.0,
            trestbps: 140.0,
            thalach: 90,
            ..reference_form()
        };

        let at_risk = health_tips(&form, &prediction(1, 0.9));
        assert_eq!(&at_risk[..5], AT_RISK_TIPS);
        assert_eq!(
            &at_risk[5..],
            &[TIP_HIGH_CHOLESTEROL, TIP_HIGH_BLOOD_PRESSURE, TIP_HIGH_SUGAR, TIP_LOW_HEART_RATE]
        );

        let healthy = health_tips(&form, &prediction(0, 0.2));
        assert_eq!(&healthy[..3], HEALTHY_TIPS);
        assert_eq!(healthy.len(), 7);
    }

    #[test]
    fn test_tips_boundaries_are_exclusive() {
        let form = PatientForm { chol: 240.0, trestbps: 130.0, thalach: 100, ..reference_form() };
        assert_eq!(health_tips(&form, &prediction(0, 0.1)), HEALTHY_TIPS.to_vec());
    }

    #[test]
    fn test_summary() {
        let form = PatientForm { chol: 260.0, ..reference_form() };
        let summary = Summary::generate(&form, &prediction(1, 0.72361));
        assert!(summary.tone.contains("elevated risk"));
        assert!(summary.risk_note.contains("72.36%"));
        assert_eq!(summary.cholesterol_note, "High cholesterol may be a concern.");
        assert_eq!(summary.blood_pressure_note, "Your blood pressure seems fine.");

        let summary = Summary::generate(&reference_form(), &prediction(0, 0.1));
        assert!(summary.tone.contains("low risk"));
        assert!(summary.risk_note.contains("10.00%"));
    }
}
