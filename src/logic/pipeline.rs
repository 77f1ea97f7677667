//! Assessment pipeline: encode -> predict -> explain -> narrate

use crate::logic::explain;
use crate::logic::features::FeatureVector;
use crate::logic::model::{predict, RiskModel};
use crate::logic::narrative::{health_tips, ConfidenceLevel, HeartAge, HeartAgeCoefficients, Summary};
use crate::models::{Assessment, PatientForm};

/// Run one validated submission through the whole pipeline
pub fn assess(model: &RiskModel, form: &PatientForm, coefficients: &HeartAgeCoefficients) -> Assessment {
    let features = FeatureVector::encode(form);
    tracing::debug!(features = %features.to_log_entry(), "encoded input");

    let prediction = predict(model, &features, form.threshold);
    let attribution = explain::explain(model, &features);

    Assessment {
        features,
        prediction,
        outcome: prediction.outcome_text(),
        confidence: ConfidenceLevel::from_probability(prediction.probability),
        summary: Summary::generate(form, &prediction),
        heart_age: HeartAge::estimate(form, coefficients),
        attribution,
        health_tips: health_tips(form, &prediction),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logic::model::artifact::tests::stump_json;
    use crate::models::YesNo;

    pub(crate) fn stump_model() -> RiskModel {
        RiskModel::from_bytes(stump_json().to_string().as_bytes(), "<memory>").unwrap()
    }

    #[test]
    fn test_assess_reference_patient() {
        let model = stump_model();
        let form = PatientForm { fbs: YesNo::No, exang: YesNo::No, ..PatientForm::default() };

        let assessment = assess(&model, &form, &HeartAgeCoefficients::default());

        // thalach 150 takes the right branch: 20 / 60
        assert!((assessment.prediction.probability - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(assessment.prediction.label, 0);
        assert_eq!(assessment.outcome, "Unlikely to have heart disease");
        assert_eq!(assessment.confidence, ConfidenceLevel::Low);
        assert_eq!(assessment.heart_age.years, 50);
        assert_eq!(assessment.health_tips.len(), 3);
        assert!(assessment.attribution.get("thalach").unwrap() > 0.0);
    }

    #[test]
    fn test_threshold_moves_label_only() {
        let model = stump_model();
        let strict = PatientForm { threshold: 0.5267, ..PatientForm::default() };
        let lenient = PatientForm { threshold: 0.3, ..PatientForm::default() };

        let a = assess(&model, &strict, &HeartAgeCoefficients::default());
        let b = assess(&model, &lenient, &HeartAgeCoefficients::default());

        assert_eq!(a.prediction.probability, b.prediction.probability);
        assert_eq!(a.attribution, b.attribution);
        assert_eq!(a.prediction.label, 0);
        assert_eq!(b.prediction.label, 1);
        assert_eq!(b.health_tips[0], "🚭 Quit smoking if you do.");
    }
}
