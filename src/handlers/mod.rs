//! HTTP handlers

pub mod assess;
pub mod health;
pub mod report;
