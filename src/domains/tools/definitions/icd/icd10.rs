//! ICD-10-CM code search via the NIH Clinical Tables service.
//!
//! The service answers with a positional array:
//! `[total, [codes], extra, [[code, name], ...]]`. Only the fourth element
//! (the display strings) is used; `null` there means no matches.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::core::config::Config;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{parse_arguments, quoted, tool_model};
use crate::domains::tools::pipeline::format::inline_record;
use crate::domains::tools::pipeline::{
    ContentType, FieldPath, FormattedText, HttpUpstream, Invocation, Node, Outcome, ParseError,
    ParseScope, Segment, Upstream, UpstreamRequest, fetch_document,
};

/// Number of matches requested from the service.
pub const RESULT_COUNT: u32 = 5;

const DISPLAY_STRINGS: FieldPath = &[Segment::Index(3)];

const CODE_FIELDS: &[(&str, FieldPath)] = &[
    ("Code", &[Segment::Index(0)]),
    ("Name", &[Segment::Index(1)]),
];

/// Parameters for ICD-10-CM code search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetIcd10CodeParams {
    #[schemars(description = "A condition name or (partial) ICD-10-CM code (e.g. 'tuberc' or 'A15')")]
    pub name_or_code: String,
}

/// NIH Clinical Tables ICD-10-CM search tool.
#[derive(Debug, Clone)]
pub struct GetIcd10CodeTool;

impl GetIcd10CodeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_icd_10_code";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Look up ICD-10-CM diagnosis codes and names by condition name or partial code using the NIH Clinical Tables search service.";

    /// Search ICD-10-CM codes matching a condition name or code prefix.
    pub async fn execute(
        params: &GetIcd10CodeParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Fetching ICD-10 codes for: {}", params.name_or_code);

        let mut invocation = Invocation::new(
            Self::NAME,
            format!("fetching ICD-10 codes for {}", quoted(&params.name_or_code)),
        );
        invocation
            .run(async {
                let term = params.name_or_code.trim();
                if term.is_empty() {
                    return Err(ToolError::invalid_arguments(
                        "Please provide a condition name or ICD-10 code.",
                    ));
                }

                let request = UpstreamRequest::for_service(
                    &config.upstream,
                    config.upstream.clinical_tables_base_url.clone(),
                    ContentType::Json,
                )
                .query("terms", term)
                .query("count", RESULT_COUNT.to_string());
                let document = fetch_document(upstream, request).await?;

                let entries = match document.root().locate(DISPLAY_STRINGS) {
                    Some(node @ Node::Json(Value::Array(_))) => node.items(),
                    Some(Node::Json(Value::Null)) => Vec::new(),
                    _ => {
                        return Err(ParseError::new(
                            ParseScope::Outer,
                            ContentType::Json,
                            "expected an array whose fourth element lists the matches",
                        )
                        .into());
                    }
                };

                if entries.is_empty() {
                    return Ok(Outcome::NotFound(format!(
                        "No ICD-10 codes found for {}.",
                        quoted(term)
                    )));
                }

                Ok(Outcome::Found(
                    entries
                        .into_iter()
                        .map(|entry| inline_record(&entry.record(CODE_FIELDS)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                ))
            })
            .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: GetIcd10CodeParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<GetIcd10CodeParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: GetIcd10CodeParams = parse_arguments(args)?;
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
    use crate::domains::tools::pipeline::{QueryValue, ResultStatus};

    fn params(value: &str) -> GetIcd10CodeParams {
        GetIcd10CodeParams {
            name_or_code: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_code() {
        let upstream = ScriptedUpstream::new()
            .json(r#"[1, ["A15"], null, [["A15", "Tuberculosis"]]]"#);
        let text = GetIcd10CodeTool::execute(&params("A15"), &upstream, &Config::default()).await;

        assert_eq!(text.status(), ResultStatus::Found);
        assert_eq!(text.text(), "Code: A15, Name: Tuberculosis");

        let request = &upstream.requests()[0];
        assert_eq!(
            request.query_param("terms"),
            Some(&QueryValue::Plain("A15".to_string()))
        );
        assert_eq!(
            request.query_param("count"),
            Some(&QueryValue::Plain("5".to_string()))
        );
    }

    #[tokio::test]
    async fn test_multiple_codes_keep_upstream_order() {
        let upstream = ScriptedUpstream::new().json(
            r#"[2, ["A15.0", "A15.4"], null, [
                ["A15.0", "Tuberculosis of lung"],
                ["A15.4", "Tuberculosis of intrathoracic lymph nodes"]
            ]]"#,
        );
        let text =
            GetIcd10CodeTool::execute(&params("tuberc"), &upstream, &Config::default()).await;
        assert_eq!(
            text.text(),
            "Code: A15.0, Name: Tuberculosis of lung\nCode: A15.4, Name: Tuberculosis of intrathoracic lymph nodes"
        );
    }

    #[tokio::test]
    async fn test_short_entry_uses_placeholder() {
        let upstream = ScriptedUpstream::new().json(r#"[1, ["Z99"], null, [["Z99"]]]"#);
        let text = GetIcd10CodeTool::execute(&params("Z99"), &upstream, &Config::default()).await;
        assert_eq!(text.text(), "Code: Z99, Name: N/A");
    }

    #[tokio::test]
    async fn test_no_codes() {
        let upstream = ScriptedUpstream::new().json(r#"[0, [], null, []]"#);
        let text =
            GetIcd10CodeTool::execute(&params("qqqq"), &upstream, &Config::default()).await;
        assert_eq!(text.text(), "No ICD-10 codes found for 'qqqq'.");
        assert_eq!(text.status(), ResultStatus::NotFound);
    }

    #[tokio::test]
    async fn test_null_matches_is_not_found() {
        let upstream = ScriptedUpstream::new().json(r#"[0, [], null, null]"#);
        let text =
            GetIcd10CodeTool::execute(&params("qqqq"), &upstream, &Config::default()).await;
        assert_eq!(text.text(), "No ICD-10 codes found for 'qqqq'.");
        assert_eq!(text.status(), ResultStatus::NotFound);
    }

    #[tokio::test]
    async fn test_non_array_matches_is_parse_error() {
        let upstream = ScriptedUpstream::new().json(r#"[0, [], null, "none"]"#);
        let text = GetIcd10CodeTool::execute(&params("A15"), &upstream, &Config::default()).await;
        assert_eq!(text.status(), ResultStatus::Failed);
    }

    #[tokio::test]
    async fn test_short_response_is_parse_error() {
        let upstream = ScriptedUpstream::new().json(r#"[0, []]"#);
        let text = GetIcd10CodeTool::execute(&params("A15"), &upstream, &Config::default()).await;
        assert_eq!(text.status(), ResultStatus::Failed);
        assert!(text.text().starts_with("Error fetching ICD-10 codes for 'A15': failed to parse outer JSON response"));
    }

    #[tokio::test]
    async fn test_malformed_body_names_the_term() {
        let upstream = ScriptedUpstream::new().json("[1, [\"A15\"");
        let text = GetIcd10CodeTool::execute(&params("A15"), &upstream, &Config::default()).await;
        assert_eq!(text.status(), ResultStatus::Failed);
        assert!(text.text().contains("A15"));
    }
}
