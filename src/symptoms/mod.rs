//! Symptom domain: catalog tables, risk scoring and condition lookup

pub mod catalog;
pub mod conditions;
pub mod risk;

pub use catalog::{display_name, SymptomCategory, SymptomInfo};
pub use risk::compute_risk;
