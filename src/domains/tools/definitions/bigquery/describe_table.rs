//! Describe one BigQuery table: metadata and schema.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use super::common::{millis_to_rfc3339, request, require_id};
use crate::core::config::Config;
use crate::domains::tools::definitions::common::{parse_arguments, tool_model};
use crate::domains::tools::pipeline::format::or_na;
use crate::domains::tools::pipeline::{
    FieldPath, FormattedText, HttpUpstream, Invocation, Node, Outcome, Segment, Upstream,
    fetch_document,
};

const TABLE_REF_ID: FieldPath = &[Segment::Key("tableReference"), Segment::Key("tableId")];
const TABLE_REF_DATASET: FieldPath =
    &[Segment::Key("tableReference"), Segment::Key("datasetId")];
const TABLE_REF_PROJECT: FieldPath =
    &[Segment::Key("tableReference"), Segment::Key("projectId")];
const LOCATION: FieldPath = &[Segment::Key("location")];
const DESCRIPTION: FieldPath = &[Segment::Key("description")];
const CREATION_TIME: FieldPath = &[Segment::Key("creationTime")];
const EXPIRATION_TIME: FieldPath = &[Segment::Key("expirationTime")];
const NUM_ROWS: FieldPath = &[Segment::Key("numRows")];
const NUM_BYTES: FieldPath = &[Segment::Key("numBytes")];
const SCHEMA_FIELDS: FieldPath = &[Segment::Key("schema"), Segment::Key("fields")];

/// BigQuery's mode for fields that do not report one.
const DEFAULT_MODE: &str = "NULLABLE";

/// Parameters for describing a BigQuery table.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DescribeTableParams {
    #[schemars(description = "The Google Cloud project ID")]
    pub project_id: String,

    #[schemars(description = "Optional location of the dataset (e.g. 'US', 'europe-west2')")]
    #[serde(default)]
    pub location: Option<String>,

    #[schemars(description = "The ID of the dataset containing the table")]
    pub dataset_id: String,

    #[schemars(description = "The ID of the table to describe")]
    pub table_id: String,
}

/// BigQuery table description tool.
#[derive(Debug, Clone)]
pub struct DescribeTableTool;

impl DescribeTableTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "describe_table";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Describe a specific table in a Google Cloud BigQuery dataset: location, description, timestamps, size and schema.";

    /// Fetch table metadata and render it with its schema.
    pub async fn execute(
        params: &DescribeTableParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!(
            "Describing BigQuery table {}.{}.{}",
            params.project_id, params.dataset_id, params.table_id
        );
        if let Some(location) = &params.location {
            debug!(location = %location, "Location supplied for table lookup");
        }

        let mut invocation = Invocation::new(
            Self::NAME,
            format!(
                "describing table {} in dataset {}",
                params.table_id, params.dataset_id
            ),
        );
        invocation
            .run(async {
                let project = require_id(&params.project_id, "project ID")?;
                let dataset = require_id(&params.dataset_id, "dataset ID")?;
                let table = require_id(&params.table_id, "table ID")?;

                let document = fetch_document(
                    upstream,
                    request(
                        config,
                        &["projects", &project, "datasets", &dataset, "tables", &table],
                    ),
                )
                .await?;

                let root = document.root();
                let requested = Requested {
                    project: &project,
                    dataset: &dataset,
                    table: &table,
                };
                Ok(Outcome::Found(render_table(root, &requested)))
            })
            .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: DescribeTableParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<DescribeTableParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: DescribeTableParams = parse_arguments(args)?;
                let upstream = HttpUpstream::new();
                Ok(Self::execute(&params, &upstream, &config)
                    .await
                    .into_call_result())
            }
            .boxed()
        })
    }
}

/// Identifiers from the call, used when the response omits its own.
struct Requested<'a> {
    project: &'a str,
    dataset: &'a str,
    table: &'a str,
}

fn render_table(table: Node<'_>, requested: &Requested<'_>) -> String {
    let table_id = table.get(TABLE_REF_ID);
    let dataset_id = table.get(TABLE_REF_DATASET);
    let project_id = table.get(TABLE_REF_PROJECT);

    let mut lines = vec![
        format!(
            "Table: {} (in dataset {}, project {})",
            table_id.as_deref().unwrap_or(requested.table),
            dataset_id.as_deref().unwrap_or(requested.dataset),
            project_id.as_deref().unwrap_or(requested.project),
        ),
        format!("Location: {}", or_na(table.get(LOCATION).as_deref())),
        format!("Description: {}", or_na(table.get(DESCRIPTION).as_deref())),
        format!(
            "Creation Time: {}",
            or_na(table.get(CREATION_TIME).map(|t| millis_to_rfc3339(&t)).as_deref())
        ),
    ];
    if let Some(expires) = table.get(EXPIRATION_TIME) {
        lines.push(format!("Expiration Time: {}", millis_to_rfc3339(&expires)));
    }
    lines.push(format!("Row Count: {}", or_na(table.get(NUM_ROWS).as_deref())));
    lines.push(format!("Byte Size: {}", or_na(table.get(NUM_BYTES).as_deref())));

    lines.push("Schema:".to_string());
    let fields = table
        .locate(SCHEMA_FIELDS)
        .map(|node| node.items())
        .unwrap_or_default();
    if fields.is_empty() {
        lines.push("  (no fields)".to_string());
    }
    for field in fields {
        lines.push(format!(
            "  - {}: {} ({})",
            or_na(field.field("name").as_deref()),
            or_na(field.field("type").as_deref()),
            field.field("mode").as_deref().unwrap_or(DEFAULT_MODE),
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::pipeline::scripted::ScriptedUpstream;
    use crate::domains::tools::pipeline::{ResultStatus, UpstreamResult};

    fn params() -> DescribeTableParams {
        DescribeTableParams {
            project_id: "p".to_string(),
            location: Some("US".to_string()),
            dataset_id: "sales".to_string(),
            table_id: "orders".to_string(),
        }
    }

    #[tokio::test]
    async fn test_describe_table_layout() {
        let upstream = ScriptedUpstream::new().json(
            r#"{
                "kind": "bigquery#table",
                "tableReference": {"projectId": "p", "datasetId": "sales", "tableId": "orders"},
                "description": "Customer orders",
                "location": "US",
                "creationTime": "1700000000000",
                "numRows": "1200",
                "numBytes": "65536",
                "schema": {"fields": [
                    {"name": "order_id", "type": "INTEGER", "mode": "REQUIRED"},
                    {"name": "note", "type": "STRING"}
                ]}
            }"#,
        );
        let text = DescribeTableTool::execute(&params(), &upstream, &Config::default()).await;

        assert_eq!(text.status(), ResultStatus::Found);
        assert_eq!(
            text.text(),
            "Table: orders (in dataset sales, project p)\n\
             Location: US\n\
             Description: Customer orders\n\
             Creation Time: 2023-11-14T22:13:20.000Z\n\
             Row Count: 1200\n\
             Byte Size: 65536\n\
             Schema:\n  \
             - order_id: INTEGER (REQUIRED)\n  \
             - note: STRING (NULLABLE)"
        );
        assert!(
            upstream.requests()[0]
                .url
                .ends_with("/projects/p/datasets/sales/tables/orders")
        );
    }

    #[tokio::test]
    async fn test_expiration_and_missing_fields() {
        let upstream = ScriptedUpstream::new().json(
            r#"{"expirationTime": "1700000000000", "schema": {"fields": []}}"#,
        );
        let text = DescribeTableTool::execute(&params(), &upstream, &Config::default()).await;

        assert!(text.text().starts_with("Table: orders (in dataset sales, project p)\n"));
        assert!(text.text().contains("Description: N/A"));
        assert!(text.text().contains("Creation Time: N/A"));
        assert!(text.text().contains("Expiration Time: 2023-11-14T22:13:20.000Z"));
        assert!(text.text().ends_with("Schema:\n  (no fields)"));
    }

    #[tokio::test]
    async fn test_missing_table_names_table_and_dataset() {
        let upstream = ScriptedUpstream::new().respond(UpstreamResult::HttpError {
            status: 404,
            body: "Not found: Table p:sales.orders".to_string(),
        });
        let text = DescribeTableTool::execute(&params(), &upstream, &Config::default()).await;
        assert_eq!(
            text.text(),
            "Error describing table orders in dataset sales: HTTP error 404: Not found: Table p:sales.orders"
        );
        assert_eq!(text.status(), ResultStatus::Failed);
    }

    #[tokio::test]
    async fn test_malformed_body_names_the_table() {
        let upstream = ScriptedUpstream::new().json("<!doctype html>");
        let text = DescribeTableTool::execute(&params(), &upstream, &Config::default()).await;
        assert!(text.text().contains("orders"));
        assert!(text.text().contains("failed to parse outer JSON response"));
    }

    #[test]
    fn test_params_require_dataset_and_table() {
        let result: Result<DescribeTableParams, _> =
            serde_json::from_str(r#"{"project_id": "p", "dataset_id": "d"}"#);
        assert!(result.is_err());
    }
}
