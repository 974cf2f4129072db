//! Ingredient search by name.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{Endpoint, fetch, ingredients, render_ingredient, request, require_text};
use crate::core::config::Config;
use crate::domains::tools::definitions::common::{parse_arguments, quoted, tool_model};
use crate::domains::tools::pipeline::format::join_blocks;
use crate::domains::tools::pipeline::{
    FormattedText, HttpUpstream, Invocation, Outcome, Upstream,
};

/// Parameters for ingredient search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchIngredientByNameParams {
    #[schemars(description = "Ingredient name to search for (e.g. 'Vodka')")]
    pub name: String,
}

/// TheCocktailDB ingredient search tool.
#[derive(Debug, Clone)]
pub struct SearchIngredientByNameTool;

impl SearchIngredientByNameTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_ingredient_by_name";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search TheCocktailDB for an ingredient by name. Returns its ID, description, whether it is alcoholic and its type.";

    /// Look up an ingredient by name.
    pub async fn execute(
        params: &SearchIngredientByNameParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Searching ingredients by name: {}", params.name);

        let mut invocation = Invocation::new(
            Self::NAME,
            format!("searching ingredients by name {}", quoted(&params.name)),
        );
        invocation
            .run(async {
                let name = require_text(&params.name, "an ingredient name")?;
                let req = request(&config.upstream, Endpoint::Search).query("i", name.as_str());
                let document = fetch(upstream, req).await?;

                let items = ingredients(document.as_ref());
                if items.is_empty() {
                    return Ok(Outcome::NotFound(format!(
                        "No ingredients found with the name {}.",
                        quoted(&name)
                    )));
                }
                Ok(Outcome::Found(join_blocks(
                    items.into_iter().map(render_ingredient),
                )))
            })
            .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: SearchIngredientByNameParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<SearchIngredientByNameParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let params: SearchIngredientByNameParams = parse_arguments(args)?;
                let upstream = HttpUpstream::new();
                Ok(Self::execute(&params, &upstream, &config)
                    .await
                    .into_call_result())
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::pipeline::scripted::ScriptedUpstream;
    use crate::domains::tools::pipeline::{QueryValue, ResultStatus, UpstreamResult};

    fn params(name: &str) -> SearchIngredientByNameParams {
        SearchIngredientByNameParams {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ingredient_block() {
        let upstream = ScriptedUpstream::new().json(
            r#"{"ingredients": [{
                "idIngredient": "1",
                "strIngredient": "Vodka",
                "strDescription": "Vodka is a distilled beverage.",
                "strType": "Vodka",
                "strAlcohol": "Yes",
                "strABV": "40"
            }]}"#,
        );
        let text =
            SearchIngredientByNameTool::execute(&params("Vodka"), &upstream, &Config::default())
                .await;

        assert_eq!(text.status(), ResultStatus::Found);
        assert_eq!(
            text.text(),
            "Ingredient: Vodka\nID: 1\nDescription: Vodka is a distilled beverage.\nAlcoholic: Yes\nType: Vodka"
        );
        assert_eq!(
            upstream.requests()[0].query_param("i"),
            Some(&QueryValue::Plain("Vodka".to_string()))
        );
    }

    #[tokio::test]
    async fn test_null_description_uses_placeholder() {
        let upstream = ScriptedUpstream::new().json(
            r#"{"ingredients": [{"idIngredient": "305", "strIngredient": "Ice",
                "strDescription": null, "strType": null, "strAlcohol": "No"}]}"#,
        );
        let text =
            SearchIngredientByNameTool::execute(&params("Ice"), &upstream, &Config::default())
                .await;
        assert!(text.text().contains("Description: N/A"));
        assert!(text.text().contains("Type: N/A"));
    }

    #[tokio::test]
    async fn test_null_ingredients_is_not_found() {
        let upstream = ScriptedUpstream::new().json(r#"{"ingredients": null}"#);
        let text =
            SearchIngredientByNameTool::execute(&params("Unobtainium"), &upstream, &Config::default())
                .await;
        assert_eq!(
            text.text(),
            "No ingredients found with the name 'Unobtainium'."
        );
        assert_eq!(text.status(), ResultStatus::NotFound);
    }

    #[tokio::test]
    async fn test_network_error_names_the_ingredient() {
        let upstream = ScriptedUpstream::new().respond(UpstreamResult::NetworkError {
            cause: "connection refused".to_string(),
        });
        let text =
            SearchIngredientByNameTool::execute(&params("Gin"), &upstream, &Config::default())
                .await;
        assert_eq!(
            text.text(),
            "Error searching ingredients by name 'Gin': Network error: connection refused"
        );
    }
}
