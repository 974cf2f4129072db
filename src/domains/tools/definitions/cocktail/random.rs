//! Random cocktail.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{Endpoint, drinks, fetch, render_drink, request};
use crate::core::config::Config;
use crate::domains::tools::definitions::common::{parse_arguments, tool_model};
use crate::domains::tools::pipeline::{
    FormattedText, HttpUpstream, Invocation, Outcome, Upstream,
};

/// This tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListRandomCocktailsParams {}

/// TheCocktailDB random cocktail tool.
#[derive(Debug, Clone)]
pub struct ListRandomCocktailsTool;

impl ListRandomCocktailsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_random_cocktails";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetch a random cocktail from TheCocktailDB with its category, glass, instructions and ingredients.";

    /// Fetch a random drink.
    pub async fn execute(
        _params: &ListRandomCocktailsParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Fetching a random cocktail");

        let mut invocation = Invocation::new(Self::NAME, "fetching a random cocktail");
        invocation
            .run(async {
                let req = request(&config.upstream, Endpoint::Random);
                let document = fetch(upstream, req).await?;

                match drinks(document.as_ref()).into_iter().next() {
                    Some(drink) => Ok(Outcome::Found(render_drink(drink))),
                    None => Ok(Outcome::NotFound(
                        "Could not fetch a random cocktail at this time.".to_string(),
                    )),
                }
            })
            .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: ListRandomCocktailsParams = if arguments.is_null() {
            ListRandomCocktailsParams::default()
        } else {
            serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {}", e))?
        };
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<ListRandomCocktailsParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: ListRandomCocktailsParams = parse_arguments(args)?;
                let upstream = HttpUpstream::new();
                Ok(Self::execute(&params, &upstream, &config)
                    .await
                    .into_call_result())
            }
            .boxed()
        })
    }
}
