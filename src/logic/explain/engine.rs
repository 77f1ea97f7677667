//! Tree Explainer - exact path-dependent TreeSHAP
//!
//! Polynomial-time Shapley values for tree ensembles (Lundberg et al.,
//! "Consistent Individualized Feature Attribution for Tree Ensembles",
//! algorithm 2). Missing features are marginalised by following both
//! children weighted by training cover.

use super::types::{AttributionMap, Explanation, ShapValues};
use crate::logic::features::{FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::model::{Ensemble, Node, RiskModel, Tree};

#[derive(Debug, Clone, Copy, Default)]
struct PathElement {
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

/// Stateless explainer over a loaded model
#[derive(Debug, Clone, Copy)]
pub struct TreeExplainer<'a> {
    model: &'a RiskModel,
}

impl<'a> TreeExplainer<'a> {
    pub fn new(model: &'a RiskModel) -> Self {
        Self { model }
    }

    /// Signed attributions in the model's output space
    pub fn shap_values(&self, features: &FeatureVector) -> Explanation {
        let x = features.as_array();

        match self.model.ensemble() {
            Ensemble::RandomForest { trees } => {
                let n = trees.len() as f64;
                let mut positive = [0.0; FEATURE_COUNT];
                let mut expected = 0.0;

                for tree in trees {
                    let phi = tree_shap(tree, x);
                    for (total, value) in positive.iter_mut().zip(phi) {
                        *total += value / n;
                    }
                    expected += tree.expected_value() / n;
                }

                // Class shares sum to one, so the negative class mirrors the positive one
                let negative = positive.map(|v| -v);
                Explanation {
                    values: ShapValues::PerClass(vec![negative, positive]),
                    expected_value: vec![1.0 - expected, expected],
                }
            }
            Ensemble::GradientBoosting { init_score, learning_rate, trees } => {
                let mut margin = [0.0; FEATURE_COUNT];
                let mut expected = *init_score;

                for tree in trees {
                    let phi = tree_shap(tree, x);
                    for (total, value) in margin.iter_mut().zip(phi) {
                        *total += learning_rate * value;
                    }
                    expected += learning_rate * tree.expected_value();
                }

                Explanation {
                    values: ShapValues::Single(margin),
                    expected_value: vec![expected],
                }
            }
        }
    }

    /// Absolute positive-class attributions
    pub fn explain(&self, features: &FeatureVector) -> AttributionMap {
        let explanation = self.shap_values(features);
        let signed = explanation.values.positive_class();

        tracing::debug!(
            expected_value = ?explanation.expected_value,
            shap_values = ?FEATURE_LAYOUT.iter().zip(signed.iter()).collect::<Vec<_>>(),
            "SHAP values for input"
        );

        let map = AttributionMap::from_signed(&signed);
        tracing::debug!(importance = ?map, "Feature importance");
        map
    }
}

// ============================================================================
// TREE SHAP
// ============================================================================

/// Shapley values of a single tree's output for `x`
pub fn tree_shap(tree: &Tree, x: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
    let mut phi = [0.0; FEATURE_COUNT];
    recurse(tree, 0, x, &mut phi, &[], 0, 1.0, 1.0, None);
    phi
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &Tree,
    node_index: usize,
    x: &[f64; FEATURE_COUNT],
    phi: &mut [f64; FEATURE_COUNT],
    parent_path: &[PathElement],
    mut unique_depth: usize,
    parent_zero_fraction: f64,
    parent_one_fraction: f64,
    parent_feature: Option<usize>,
) {
    let mut path = Vec::with_capacity(unique_depth + 1);
    path.extend_from_slice(&parent_path[..unique_depth]);
    path.push(PathElement::default());
    extend_path(&mut path, unique_depth, parent_zero_fraction, parent_one_fraction, parent_feature);

    match tree.node(node_index) {
        Node::Leaf { value, .. } => {
            for i in 1..=unique_depth {
                let weight = unwound_path_sum(&path, unique_depth, i);
                let element = path[i];
                if let Some(feature) = element.feature {
                    phi[feature] += weight * (element.one_fraction - element.zero_fraction) * value;
                }
            }
        }
        Node::Split { feature, threshold, left, right, cover } => {
            let (hot, cold) = if Tree::goes_left(x[*feature], *threshold) {
                (*left, *right)
            } else {
                (*right, *left)
            };
            let hot_zero_fraction = tree.node(hot).cover() / cover;
            let cold_zero_fraction = tree.node(cold).cover() / cover;

            let mut incoming_zero_fraction = 1.0;
            let mut incoming_one_fraction = 1.0;

            // A feature split on twice along the path keeps a single entry
            if let Some(k) = (1..=unique_depth).find(|&k| path[k].feature == Some(*feature)) {
                incoming_zero_fraction = path[k].zero_fraction;
                incoming_one_fraction = path[k].one_fraction;
                unwind_path(&mut path, unique_depth, k);
                unique_depth -= 1;
            }

            recurse(
                tree,
                hot,
                x,
                phi,
                &path,
                unique_depth + 1,
                hot_zero_fraction * incoming_zero_fraction,
                incoming_one_fraction,
                Some(*feature),
            );
            recurse(
                tree,
                cold,
                x,
                phi,
                &path,
                unique_depth + 1,
                cold_zero_fraction * incoming_zero_fraction,
                0.0,
                Some(*feature),
            );
        }
    }
}

fn extend_path(
    path: &mut [PathElement],
    unique_depth: usize,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    path[unique_depth] = PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if unique_depth == 0 { 1.0 } else { 0.0 },
    };

    let depth = (unique_depth + 1) as f64;
    for i in (0..unique_depth).rev() {
        path[i + 1].pweight += one_fraction * path[i].pweight * (i + 1) as f64 / depth;
        path[i].pweight = zero_fraction * path[i].pweight * (unique_depth - i) as f64 / depth;
    }
}

fn unwind_path(path: &mut [PathElement], unique_depth: usize, path_index: usize) {
    let one_fraction = path[path_index].one_fraction;
    let zero_fraction = path[path_index].zero_fraction;
    let mut next_one_portion = path[unique_depth].pweight;
    let depth = (unique_depth + 1) as f64;

    for i in (0..unique_depth).rev() {
        if one_fraction != 0.0 {
            let previous = path[i].pweight;
            path[i].pweight = next_one_portion * depth / ((i + 1) as f64 * one_fraction);
            next_one_portion =
                previous - path[i].pweight * zero_fraction * (unique_depth - i) as f64 / depth;
        } else {
            path[i].pweight = path[i].pweight * depth / (zero_fraction * (unique_depth - i) as f64);
        }
    }

    for i in path_index..unique_depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
}

fn unwound_path_sum(path: &[PathElement], unique_depth: usize, path_index: usize) -> f64 {
    let one_fraction = path[path_index].one_fraction;
    let zero_fraction = path[path_index].zero_fraction;
    let mut next_one_portion = path[unique_depth].pweight;
    let depth = (unique_depth + 1) as f64;
    let mut total = 0.0;

    for i in (0..unique_depth).rev() {
        if one_fraction != 0.0 {
            let portion = next_one_portion * depth / ((i + 1) as f64 * one_fraction);
            total += portion;
            next_one_portion =
                path[i].pweight - portion * zero_fraction * ((unique_depth - i) as f64 / depth);
        } else if zero_fraction != 0.0 {
            total += (path[i].pweight / zero_fraction) / ((unique_depth - i) as f64 / depth);
        }
    }

    total
}

// ============================================================================
// TESTS
// ============================================================================
