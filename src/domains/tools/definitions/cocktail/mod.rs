//! TheCocktailDB tools module.
//!
//! - `search_by_name`: drinks whose name matches
//! - `by_first_letter`: drinks starting with a letter
//! - `search_ingredient`: ingredient details
//! - `random`: one random drink
//! - `lookup_by_id`: one drink by ID

pub mod by_first_letter;
pub mod common;
pub mod lookup_by_id;
pub mod random;
pub mod search_by_name;
pub mod search_ingredient;

pub use by_first_letter::{ListCocktailsByFirstLetterParams, ListCocktailsByFirstLetterTool};
pub use lookup_by_id::{LookupCocktailDetailsByIdParams, LookupCocktailDetailsByIdTool};
pub use random::{ListRandomCocktailsParams, ListRandomCocktailsTool};
pub use search_by_name::{SearchCocktailByNameParams, SearchCocktailByNameTool};
pub use search_ingredient::{SearchIngredientByNameParams, SearchIngredientByNameTool};
