//! MedlinePlus health topic lookup.
//!
//! The `rettype=topic` response is an XML search result whose
//! `healthTopic` content element carries a second, escaped XML document.
//! That payload is parsed on its own and searched for a summary, then a
//! description. When neither exists the topic URL from the outer document
//! is offered instead.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::config::Config;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{parse_arguments, quoted, tool_model};
use crate::domains::tools::pipeline::format::or_na;
use crate::domains::tools::pipeline::{
    ContentType, FieldPath, FormattedText, HttpUpstream, Invocation, Outcome, QueryValue, Segment,
    Upstream, UpstreamRequest, extract, fetch_document, parse_nested,
};

const HEALTH_TOPIC: FieldPath = &[Segment::DescendantWith {
    element: "content",
    attribute: "name",
    value: "healthTopic",
}];
const TOPIC_URL: FieldPath = &[Segment::Descendant("document"), Segment::Attribute("url")];

/// Which part of the topic the explanation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    Description,
}

const TOPIC_SECTIONS: &[(Section, FieldPath)] = &[
    (
        Section::Summary,
        &[
            Segment::Child("summary_section"),
            Segment::Child("summary_content"),
        ],
    ),
    (
        Section::Description,
        &[
            Segment::Child("description_section"),
            Segment::Child("description_content"),
        ],
    ),
];

/// Parameters for medical term lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetMedicalTermParams {
    #[schemars(description = "The medical term to explain (e.g. 'asthma', 'high blood pressure')")]
    pub term: String,
}

/// MedlinePlus health topic tool.
#[derive(Debug, Clone)]
pub struct GetMedicalTermTool;

impl GetMedicalTermTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_medical_term";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get an explanation of a medical term from MedlinePlus health topics. Returns the topic summary or description, or a link to the topic page.";

    /// Execute the tool logic: outer search result, then the nested topic.
    pub async fn execute(
        params: &GetMedicalTermParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Retrieving medical term: {}", params.term);

        let mut invocation = Invocation::new(
            Self::NAME,
            format!("retrieving medical term {}", quoted(&params.term)),
        );
        invocation
            .run(async {
                let term = params.term.trim();
                if term.is_empty() {
                    return Err(ToolError::invalid_arguments(
                        "Please provide a medical term.",
                    ));
                }

                let outer = fetch_document(upstream, Self::request(config, term)).await?;
                let root = outer.root();

                let Some(payload) = root.get(HEALTH_TOPIC) else {
                    return Ok(Outcome::NotFound(format!(
                        "No detailed topic content found for {}. It might not be available or the term is too broad/specific.",
                        quoted(term)
                    )));
                };

                debug!(bytes = payload.len(), "Parsing nested health topic");
                let topic = parse_nested(&payload, ContentType::Xml)?;

                Ok(match extract(&topic, TOPIC_SECTIONS) {
                    Some((Section::Summary, text)) => {
                        Outcome::Found(format!("Summary for {}: {}", term, text))
                    }
                    Some((Section::Description, text)) => {
                        Outcome::Found(format!("Explanation for {}: {}", term, text))
                    }
                    None => Outcome::NotFound(format!(
                        "Could not find a specific summary or description for {}. You can find more information at: {}",
                        quoted(term),
                        or_na(root.get(TOPIC_URL).as_deref())
                    )),
                })
            })
            .await
    }

    fn request(config: &Config, term: &str) -> UpstreamRequest {
        UpstreamRequest::for_service(
            &config.upstream,
            config.upstream.medlineplus_base_url.clone(),
            ContentType::Xml,
        )
        .query("db", "healthTopics")
        .query_value("term", QueryValue::encode_multi_word(term))
        .query("rettype", "topic")
        .query("tool", config.server.name.as_str())
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: GetMedicalTermParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<GetMedicalTermParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: GetMedicalTermParams = parse_arguments(args)?;
                let upstream = HttpUpstream::new();
                Ok(Self::execute(&params, &upstream, &config)
                    .await
                    .into_call_result())
            }
            .boxed()
        })
    }
}
