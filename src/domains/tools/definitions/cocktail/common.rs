//! Common utilities shared across TheCocktailDB tools.
//!
//! Request construction, the "no results" rule, and the drink and
//! ingredient block layouts live here so every cocktail tool renders the
//! same way.

use std::ops::RangeInclusive;

use serde_json::Value;

use crate::core::config::UpstreamConfig;
use crate::domains::tools::ToolError;
use crate::domains::tools::pipeline::format::{join_pairs, labeled_block};
use crate::domains::tools::pipeline::{
    ContentType, FieldPath, Node, ParsedDocument, Segment, Upstream, UpstreamRequest,
    extract_all, fetch_document, probe_indexed,
};

/// Ingredient/measure slots carried by every drink (`strIngredient1..15`).
pub const INGREDIENT_SLOTS: RangeInclusive<usize> = 1..=15;

const INGREDIENT_PREFIX: &str = "strIngredient";
const MEASURE_PREFIX: &str = "strMeasure";

/// Top-level keys that mark a response as carrying results.
const RESULT_KEYS: &[&str] = &["drinks", "ingredients"];

const DRINKS: FieldPath = &[Segment::Key("drinks")];
const INGREDIENTS: FieldPath = &[Segment::Key("ingredients")];

const DRINK_FIELDS: &[(&str, FieldPath)] = &[
    ("ID", &[Segment::Key("idDrink")]),
    ("Name", &[Segment::Key("strDrink")]),
    ("Category", &[Segment::Key("strCategory")]),
    ("Alcoholic", &[Segment::Key("strAlcoholic")]),
    ("Glass", &[Segment::Key("strGlass")]),
    ("Instructions", &[Segment::Key("strInstructions")]),
];

const INGREDIENT_FIELDS: &[(&str, FieldPath)] = &[
    ("Ingredient", &[Segment::Key("strIngredient")]),
    ("ID", &[Segment::Key("idIngredient")]),
    ("Description", &[Segment::Key("strDescription")]),
    ("Alcoholic", &[Segment::Key("strAlcohol")]),
    ("Type", &[Segment::Key("strType")]),
];

/// TheCocktailDB endpoints used by the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Lookup,
    Random,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Search => "search.php",
            Self::Lookup => "lookup.php",
            Self::Random => "random.php",
        }
    }
}

/// Build a request for `endpoint`; callers add the query parameters.
pub fn request(config: &UpstreamConfig, endpoint: Endpoint) -> UpstreamRequest {
    UpstreamRequest::for_service(
        config,
        format!(
            "{}/{}",
            config.cocktaildb_base_url.trim_end_matches('/'),
            endpoint.path()
        ),
        ContentType::Json,
    )
}

/// Fetch and decode a CocktailDB response.
///
/// Returns `None` when the body holds neither a drinks nor an ingredients
/// list, which the service uses to say "nothing matched".
pub async fn fetch(
    upstream: &dyn Upstream,
    request: UpstreamRequest,
) -> Result<Option<ParsedDocument>, ToolError> {
    let document = fetch_document(upstream, request).await?;
    if document.has_any_key(RESULT_KEYS) {
        Ok(Some(document))
    } else {
        Ok(None)
    }
}

/// Drinks in upstream order. Empty for a missing or non-list `drinks`.
pub fn drinks(document: Option<&ParsedDocument>) -> Vec<Node<'_>> {
    entities(document, DRINKS)
}

/// Ingredients in upstream order.
pub fn ingredients(document: Option<&ParsedDocument>) -> Vec<Node<'_>> {
    entities(document, INGREDIENTS)
}

/// Object entries under `path`. Nulls and scalars in the list are skipped.
fn entities<'a>(document: Option<&'a ParsedDocument>, path: FieldPath) -> Vec<Node<'a>> {
    document
        .map(|doc| extract_all(doc, path))
        .unwrap_or_default()
        .into_iter()
        .filter(|node| matches!(node, Node::Json(Value::Object(_))))
        .collect()
}

/// Render one drink as a block of `Label: value` lines followed by the
/// ingredient list.
pub fn render_drink(drink: Node<'_>) -> String {
    let mut block = labeled_block(&drink.record(DRINK_FIELDS));
    let pairs = probe_indexed(drink, INGREDIENT_PREFIX, MEASURE_PREFIX, INGREDIENT_SLOTS);
    if !pairs.is_empty() {
        block.push_str("\nIngredients: ");
        block.push_str(&join_pairs(&pairs));
    }
    block
}

/// Render one ingredient as a block of `Label: value` lines.
pub fn render_ingredient(ingredient: Node<'_>) -> String {
    labeled_block(&ingredient.record(INGREDIENT_FIELDS))
}

/// Reject blank text arguments.
pub fn require_text(value: &str, what: &str) -> Result<String, ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ToolError::invalid_arguments(format!(
            "Please provide {}.",
            what
        )))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A Margarita as TheCocktailDB returns it (trimmed to the used keys).
    pub(crate) const MARGARITA: &str = r#"{
        "idDrink": "11007",
        "strDrink": "Margarita",
        "strCategory": "Ordinary Drink",
        "strAlcoholic": "Alcoholic",
        "strGlass": "Cocktail glass",
        "strInstructions": "Rub the rim of the glass with the lime slice.",
        "strIngredient1": "Tequila", "strMeasure1": "1 1/2 oz ",
        "strIngredient2": "Triple sec", "strMeasure2": "1/2 oz ",
        "strIngredient3": "Lime juice", "strMeasure3": "1 oz ",
        "strIngredient4": "Salt", "strMeasure4": null,
        "strIngredient5": null, "strMeasure5": null
    }"#;

    /// A second drink with sparse fields.
    pub(crate) const BLUE_MARGARITA: &str = r#"{
        "idDrink": "11118",
        "strDrink": "Blue Margarita",
        "strCategory": "Ordinary Drink",
        "strAlcoholic": "Alcoholic",
        "strGlass": null,
        "strInstructions": "Shake and strain.",
        "strIngredient1": "Tequila", "strMeasure1": "1 1/2 oz "
    }"#;

    pub(crate) fn drinks(items: &[&str]) -> String {
        format!(r#"{{"drinks": [{}]}}"#, items.join(","))
    }
}
