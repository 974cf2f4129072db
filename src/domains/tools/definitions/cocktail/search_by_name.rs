//! Cocktail search by name.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{Endpoint, drinks, fetch, render_drink, request, require_text};
use crate::core::config::Config;
use crate::domains::tools::definitions::common::{parse_arguments, quoted, tool_model};
use crate::domains::tools::pipeline::format::join_blocks;
use crate::domains::tools::pipeline::{
    FormattedText, HttpUpstream, Invocation, Outcome, Upstream,
};

/// Parameters for a cocktail name search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchCocktailByNameParams {
    /// Full or partial cocktail name, e.g. "Margarita".
    #[schemars(description = "Cocktail name to search for (e.g. 'Margarita')")]
    pub name: String,
}

/// TheCocktailDB cocktail name search tool.
#[derive(Debug, Clone)]
pub struct SearchCocktailByNameTool;

impl SearchCocktailByNameTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_cocktail_by_name";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search TheCocktailDB for cocktails by name. Returns one block per matching drink with its category, glass, instructions and ingredients.";

    /// Run the search against `upstream`.
    pub async fn execute(
        params: &SearchCocktailByNameParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Searching cocktails by name: {}", params.name);

        let mut invocation = Invocation::new(
            Self::NAME,
            format!("searching cocktails by name {}", quoted(&params.name)),
        );
        invocation
            .run(async {
                let name = require_text(&params.name, "a cocktail name")?;
                let req = request(&config.upstream, Endpoint::Search).query("s", name.as_str());
                let document = fetch(upstream, req).await?;

                let items = drinks(document.as_ref());
                if items.is_empty() {
                    return Ok(Outcome::NotFound(format!(
                        "No cocktails found with the name {}.",
                        quoted(&name)
                    )));
                }
                Ok(Outcome::Found(join_blocks(
                    items.into_iter().map(render_drink),
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
        let params: SearchCocktailByNameParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<SearchCocktailByNameParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: SearchCocktailByNameParams = parse_arguments(args)?;
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
    use crate::domains::tools::definitions::cocktail::common::fixtures;
    use crate::domains::tools::pipeline::scripted::ScriptedUpstream;
    use crate::domains::tools::pipeline::{QueryValue, ResultStatus, UpstreamResult};

    fn params(name: &str) -> SearchCocktailByNameParams {
        SearchCocktailByNameParams {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_two_drinks_are_separated() {
        let upstream = ScriptedUpstream::new().json(&fixtures::drinks(&[
            fixtures::MARGARITA,
            fixtures::BLUE_MARGARITA,
        ]));
        let text =
            SearchCocktailByNameTool::execute(&params("Margarita"), &upstream, &Config::default())
                .await;

        assert_eq!(text.status(), ResultStatus::Found);
        let lines: Vec<_> = text.text().lines().collect();
        assert_eq!(lines.iter().filter(|line| **line == "---").count(), 1);
        assert!(text.text().starts_with("ID: 11007\nName: Margarita"));
        assert!(text.text().contains("---\nID: 11118\nName: Blue Margarita"));
    }

    #[tokio::test]
    async fn test_request_uses_search_endpoint() {
        let upstream = ScriptedUpstream::new().json(r#"{"drinks": null}"#);
        SearchCocktailByNameTool::execute(&params("Margarita"), &upstream, &Config::default())
            .await;

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/search.php"));
        assert_eq!(
            requests[0].query_param("s"),
            Some(&QueryValue::Plain("Margarita".to_string()))
        );
        assert!(requests[0].header_value("user-agent").is_some());
    }

    #[tokio::test]
    async fn test_null_drinks_is_not_found() {
        let upstream = ScriptedUpstream::new().json(r#"{"drinks": null}"#);
        let text =
            SearchCocktailByNameTool::execute(&params("Nonexistent"), &upstream, &Config::default())
                .await;
        assert_eq!(
            text.text(),
            "No cocktails found with the name 'Nonexistent'."
        );
        assert_eq!(text.status(), ResultStatus::NotFound);
    }

    #[tokio::test]
    async fn test_list_of_nulls_is_not_found() {
        let upstream = ScriptedUpstream::new().json(r#"{"drinks": [null]}"#);
        let text =
            SearchCocktailByNameTool::execute(&params("Margarita"), &upstream, &Config::default())
                .await;
        assert_eq!(text.text(), "No cocktails found with the name 'Margarita'.");
        assert_eq!(text.status(), ResultStatus::NotFound);
    }

    #[tokio::test]
    async fn test_missing_keys_is_not_found() {
        let upstream = ScriptedUpstream::new().json(r#"{"meals": []}"#);
        let text =
            SearchCocktailByNameTool::execute(&params("Mojito"), &upstream, &Config::default())
                .await;
        assert_eq!(text.text(), "No cocktails found with the name 'Mojito'.");
    }

    #[tokio::test]
    async fn test_malformed_body_names_the_search() {
        let upstream = ScriptedUpstream::new().json("{\"drinks\": [");
        let text =
            SearchCocktailByNameTool::execute(&params("Margarita"), &upstream, &Config::default())
                .await;
        assert_eq!(text.status(), ResultStatus::Failed);
        assert!(text.text().contains("Margarita"));
        assert!(text.text().contains("failed to parse outer JSON response"));
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let upstream = ScriptedUpstream::new().respond(UpstreamResult::HttpError {
            status: 503,
            body: "Service Unavailable".to_string(),
        });
        let text =
            SearchCocktailByNameTool::execute(&params("Margarita"), &upstream, &Config::default())
                .await;
        assert_eq!(
            text.text(),
            "Error searching cocktails by name 'Margarita': HTTP error 503: Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_request() {
        let upstream = ScriptedUpstream::new();
        let text =
            SearchCocktailByNameTool::execute(&params("   "), &upstream, &Config::default()).await;
        assert_eq!(text.text(), "Please provide a cocktail name.");
        assert!(upstream.requests().is_empty());
    }

    #[test]
    fn test_params_reject_unknown_fields() {
        let result: Result<SearchCocktailByNameParams, _> =
            serde_json::from_str(r#"{"name": "Margarita", "limit": 2}"#);
        assert!(result.is_err());
    }

    #[ignore]
    #[tokio::test]
    async fn test_live_search() {
        let text = SearchCocktailByNameTool::execute(
            &params("Margarita"),
            &HttpUpstream::new(),
            &Config::default(),
        )
        .await;
        assert!(text.text().contains("Margarita"));
    }
}
