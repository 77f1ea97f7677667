use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::logic::features::{FEATURE_COUNT, FEATURE_LAYOUT};

/// Raw explainer output, one shape per ensemble kind
#[derive(Debug, Clone, PartialEq)]
pub enum ShapValues {
    /// One signed attribution set per class (forest probabilities)
    PerClass(Vec<[f64; FEATURE_COUNT]>),
    /// A single signed set (boosting margin)
    Single([f64; FEATURE_COUNT]),
}

impl ShapValues {
    /// The set explaining the positive class
    pub fn positive_class(&self) -> [f64; FEATURE_COUNT] {
        match self {
            ShapValues::PerClass(sets) => sets
                .get(1)
                .or_else(|| sets.last())
                .copied()
                .unwrap_or([0.0; FEATURE_COUNT]),
            ShapValues::Single(set) => *set,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub values: ShapValues,
    /// Model output with no feature known, per set
    pub expected_value: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub name: &'static str,
    pub importance: f64,
}

/// Per-feature contribution magnitudes for one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributionMap {
    importance: [f64; FEATURE_COUNT],
}

impl AttributionMap {
    /// Absolute values of a signed attribution set
    pub fn from_signed(values: &[f64; FEATURE_COUNT]) -> Self {
        Self { importance: values.map(f64::abs) }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_LAYOUT.iter().position(|&n| n == name).map(|i| self.importance[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = FeatureContribution> + '_ {
        FEATURE_LAYOUT
            .iter()
            .zip(self.importance.iter())
            .map(|(&name, &importance)| FeatureContribution { name, importance })
    }

    /// Largest contributions first; ties keep layout order
    pub fn top(&self, n: usize) -> Vec<FeatureContribution> {
        let mut all: Vec<FeatureContribution> = self.iter().collect();
        all.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        all.truncate(n);
        all
    }
}

impl Serialize for AttributionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for contribution in self.iter() {
            map.serialize_entry(contribution.name, &contribution.importance)?;
        }
        map.end()
    }
}
