//! Feature Module - layout and encoding of model inputs

pub mod layout;
pub mod vector;

pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::FeatureVector;
