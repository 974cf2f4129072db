//! Tool definitions module.
//!
//! One file per tool, grouped by upstream service. Each tool exposes its
//! name, description, parameter struct, `execute()` and route builders.

pub mod bigquery;
pub mod cocktail;
pub mod common;
pub mod icd;
pub mod medical;

pub use bigquery::{DescribeTableTool, ListTablesTool};
pub use cocktail::{
    ListCocktailsByFirstLetterTool, ListRandomCocktailsTool, LookupCocktailDetailsByIdTool,
    SearchCocktailByNameTool, SearchIngredientByNameTool,
};
pub use icd::GetIcd10CodeTool;
pub use medical::GetMedicalTermTool;
