//! Business logic

pub mod explain;
pub mod features;
pub mod model;
pub mod narrative;
pub mod pipeline;
