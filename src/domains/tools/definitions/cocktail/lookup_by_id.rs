//! Cocktail details by TheCocktailDB ID.

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
use crate::domains::tools::pipeline::{
    FormattedText, HttpUpstream, Invocation, Outcome, Upstream,
};

/// Parameters for cocktail lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LookupCocktailDetailsByIdParams {
    #[schemars(description = "TheCocktailDB drink ID (e.g. '11007')")]
    pub id: String,
}

/// TheCocktailDB lookup-by-ID tool.
#[derive(Debug, Clone)]
pub struct LookupCocktailDetailsByIdTool;

impl LookupCocktailDetailsByIdTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lookup_cocktail_details_by_id";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Look up the full details of a cocktail by its TheCocktailDB ID.";

    /// Fetch one drink by its ID.
    pub async fn execute(
        params: &LookupCocktailDetailsByIdParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Looking up cocktail ID: {}", params.id);

        let mut invocation = Invocation::new(
            Self::NAME,
            format!("looking up cocktail ID {}", quoted(&params.id)),
        );
        invocation
            .run(async {
                let id = require_text(&params.id, "a cocktail ID")?;
                let req = request(&config.upstream, Endpoint::Lookup).query("i", id.as_str());
                let document = fetch(upstream, req).await?;

                match drinks(document.as_ref()).into_iter().next() {
                    Some(drink) => Ok(Outcome::Found(render_drink(drink))),
                    None => Ok(Outcome::NotFound(format!(
                        "No cocktail found with ID: {}.",
                        id
                    ))),
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
        let params: LookupCocktailDetailsByIdParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<LookupCocktailDetailsByIdParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: LookupCocktailDetailsByIdParams = parse_arguments(args)?;
                let upstream = HttpUpstream::new();
                Ok(Self::execute(&params, &upstream, &config)
                    .await
                    .into_call_result())
            }
            .boxed()
        })
    }
}
