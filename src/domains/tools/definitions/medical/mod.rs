//! MedlinePlus tools module.

pub mod medical_term;

pub use medical_term::{GetMedicalTermParams, GetMedicalTermTool};
