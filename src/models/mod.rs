//! Data models

pub mod assessment;
pub mod patient;

pub use assessment::*;
pub use patient::*;
