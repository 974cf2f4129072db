//! ICD-10-CM tools module.

pub mod icd10;

pub use icd10::{GetIcd10CodeParams, GetIcd10CodeTool};
