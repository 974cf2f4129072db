//! List cocktails by their first letter.

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
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{parse_arguments, quoted, tool_model};
use crate::domains::tools::pipeline::format::join_blocks;
use crate::domains::tools::pipeline::{
    FormattedText, HttpUpstream, Invocation, Outcome, Upstream,
};

/// Parameters for first-letter listing.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListCocktailsByFirstLetterParams {
    #[schemars(description = "A single alphabetical character (e.g. 'a')")]
    pub letter: String,
}

/// TheCocktailDB first-letter listing tool.
#[derive(Debug, Clone)]
pub struct ListCocktailsByFirstLetterTool;

impl ListCocktailsByFirstLetterTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_cocktails_by_first_letter";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List all cocktails in TheCocktailDB whose name starts with the given letter.";

    /// List every drink whose name starts with the given letter.
    pub async fn execute(
        params: &ListCocktailsByFirstLetterParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Listing cocktails starting with: {}", params.letter);

        let mut invocation = Invocation::new(
            Self::NAME,
            format!("listing cocktails starting with {}", quoted(&params.letter)),
        );
        invocation
            .run(async {
                let letter = single_letter(&params.letter)?;
                let req = request(&config.upstream, Endpoint::Search)
                    .query("f", letter.to_lowercase().to_string());
                let document = fetch(upstream, req).await?;

                let items = drinks(document.as_ref());
                if items.is_empty() {
                    return Ok(Outcome::NotFound(format!(
                        "No cocktails found starting with the letter {}.",
                        quoted(&letter.to_uppercase().to_string())
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
        let params: ListCocktailsByFirstLetterParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<ListCocktailsByFirstLetterParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: ListCocktailsByFirstLetterParams = parse_arguments(args)?;
                let upstream = HttpUpstream::new();
                Ok(Self::execute(&params, &upstream, &config)
                    .await
                    .into_call_result())
            }
            .boxed()
        })
    }
}

/// Accept exactly one alphabetical character.
fn single_letter(value: &str) -> Result<char, ToolError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Ok(c),
        _ => Err(ToolError::invalid_arguments(
            "Please provide a single alphabetical character.",
        )),
    }
}
