//! Patient input model
//!
//! Raw form values as the user picks them. Categorical fields are typed
//! enums so a value outside the fixed vocabulary is rejected when the
//! request is deserialized.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::logic::model::threshold::DEFAULT_THRESHOLD;

// ============================================================================
// CATEGORICAL VOCABULARIES
// ============================================================================

/// A fixed selectable vocabulary with a numeric code per choice
pub trait Categorical: Copy + Sized + 'static {
    /// Every choice, in the order the form lists them
    const ALL: &'static [Self];

    /// Label shown in the form (and accepted on submission)
    fn label(self) -> &'static str;

    /// Integer code the model was trained on
    fn code(self) -> u8;
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($label:literal, $code:literal $(, alias = $alias:literal)?) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label $(, alias = $alias)?)]
                $variant,
            )+
        }

        impl Categorical for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }
    };
}

categorical! {
    /// Biological sex
    Sex {
        Male => ("Male", 1),
        Female => ("Female", 0),
    }
}

categorical! {
    /// Chest pain type
    ChestPain {
        TypicalAngina => ("Typical Angina", 1),
        AtypicalAngina => ("Atypical Angina", 2),
        NonAnginalPain => ("Non-Anginal Pain", 3),
        Asymptomatic => ("Asymptomatic", 4),
    }
}

categorical! {
    /// Yes/No answer (fasting blood sugar, exercise induced angina)
    YesNo {
        Yes => ("Yes", 1),
        No => ("No", 0),
    }
}

categorical! {
    /// Resting electrocardiographic result
    RestingEcg {
        Normal => ("Normal", 0),
        StTAbnormality => ("Having ST-T wave abnormality", 1, alias = "ST-T abnormality"),
        LeftVentricularHypertrophy => (
            "Showing probable or definite left ventricular hypertrophy",
            2,
            alias = "left ventricular hypertrophy"
        ),
    }
}

categorical! {
    /// Slope of the peak exercise ST segment
    StSlope {
        Upsloping => ("Upsloping", 1),
        Flat => ("Flat", 2),
        Downsloping => ("Downsloping", 3),
    }
}

categorical! {
    /// Thalassemia category
    Thalassemia {
        Normal => ("Normal", 2),
        FixedDefect => ("Fixed Defect", 1),
        ReversibleDefect => ("Reversible Defect", 3),
    }
}

// ============================================================================
// PATIENT FORM
// ============================================================================

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// One submission of the assessment form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PatientForm {
    #[validate(range(min = 5, max = 99))]
    pub age: i32,
    pub sex: Sex,
    pub cp: ChestPain,
    /// Resting blood pressure (mmHg)
    #[validate(range(min = 0.0))]
    pub trestbps: f64,
    /// Serum cholesterol (mg/dl)
    #[validate(range(min = 0.0))]
    pub chol: f64,
    /// Fasting blood sugar > 120 mg/dl
    pub fbs: YesNo,
    pub restecg: RestingEcg,
    /// Maximum heart rate achieved
    #[validate(range(min = 50, max = 220))]
    pub thalach: i32,
    /// Exercise induced angina
    pub exang: YesNo,
    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,
    pub slope: StSlope,
    /// Major vessels colored by fluoroscopy
    #[validate(range(max = 3))]
    pub ca: u8,
    pub thal: Thalassemia,
    /// Decision threshold on the positive-class probability
    #[serde(default = "default_threshold")]
    #[validate(range(min = 0.1, max = 0.9))]
    pub threshold: f64,
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            age: 50,
            sex: Sex::Male,
            cp: ChestPain::TypicalAngina,
            trestbps: 120.0,
            chol: 200.0,
            fbs: YesNo::Yes,
            restecg: RestingEcg::Normal,
            thalach: 150,
            exang: YesNo::Yes,
            oldpeak: 0.0,
            slope: StSlope::Upsloping,
            ca: 0,
            thal: Thalassemia::Normal,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl PatientForm {
    /// Run the declared bounds plus the finiteness check the derive can't express
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;

        let floats = [
            ("trestbps", self.trestbps),
            ("chol", self.chol),
            ("oldpeak", self.oldpeak),
            ("threshold", self.threshold),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(format!("{}: must be a finite number", name));
            }
        }

        Ok(())
    }

    /// Overlay raw submitted pairs field by field, keeping `self` wherever a
    /// value is missing or does not parse. Used to re-render a rejected form.
    pub fn with_submitted(mut self, pairs: &HashMap<String, String>) -> Self {
        fn number<T: FromStr>(pairs: &HashMap<String, String>, key: &str) -> Option<T> {
            pairs.get(key).and_then(|v| v.trim().parse().ok())
        }

        fn choice<C: Categorical>(pairs: &HashMap<String, String>, key: &str) -> Option<C> {
            let value = pairs.get(key)?;
            C::ALL.iter().copied().find(|c| c.label() == value.as_str())
        }

        self.age = number(pairs, "age").unwrap_or(self.age);
        self.sex = choice(pairs, "sex").unwrap_or(self.sex);
        self.cp = choice(pairs, "cp").unwrap_or(self.cp);
        self.trestbps = number(pairs, "trestbps").unwrap_or(self.trestbps);
        self.chol = number(pairs, "chol").unwrap_or(self.chol);
        self.fbs = choice(pairs, "fbs").unwrap_or(self.fbs);
        self.restecg = choice(pairs, "restecg").unwrap_or(self.restecg);
        self.thalach = number(pairs, "thalach").unwrap_or(self.thalach);
        self.exang = choice(pairs, "exang").unwrap_or(self.exang);
        self.oldpeak = number(pairs, "oldpeak").unwrap_or(self.oldpeak);
        self.slope = choice(pairs, "slope").unwrap_or(self.slope);
        self.ca = number(pairs, "ca").unwrap_or(self.ca);
        self.thal = choice(pairs, "thal").unwrap_or(self.thal);
        self.threshold = number(pairs, "threshold").unwrap_or(self.threshold);
        self
    }
}
