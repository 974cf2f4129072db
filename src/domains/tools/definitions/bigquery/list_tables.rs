//! List every table of every dataset in a BigQuery project.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use super::common::{request, require_id};
use crate::core::config::Config;
use crate::domains::tools::definitions::common::{parse_arguments, quoted, tool_model};
use crate::domains::tools::pipeline::{
    FieldPath, FormattedText, HttpUpstream, Invocation, Outcome, Segment, Upstream, extract_all,
    fetch_document,
};

const DATASETS: FieldPath = &[Segment::Key("datasets")];
const DATASET_ID: FieldPath = &[Segment::Key("datasetReference"), Segment::Key("datasetId")];
const DATASET_LOCATION: FieldPath = &[Segment::Key("location")];
const TABLES: FieldPath = &[Segment::Key("tables")];
const TABLE_ID: FieldPath = &[Segment::Key("tableReference"), Segment::Key("tableId")];

/// Parameters for listing BigQuery tables.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListTablesParams {
    #[schemars(description = "The Google Cloud project ID")]
    pub project_id: String,

    /// Only datasets in this location are listed when set.
    #[schemars(description = "Optional dataset location filter (e.g. 'US', 'europe-west2')")]
    #[serde(default)]
    pub location: Option<String>,
}

/// BigQuery dataset and table listing tool.
#[derive(Debug, Clone)]
pub struct ListTablesTool;

impl ListTablesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_tables";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List all tables for all datasets in a Google Cloud BigQuery project, optionally restricted to datasets in one location.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    pub async fn execute(
        params: &ListTablesParams,
        upstream: &dyn Upstream,
        config: &Config,
    ) -> FormattedText {
        info!("Listing BigQuery tables in project: {}", params.project_id);

        let mut invocation = Invocation::new(
            Self::NAME,
            format!("listing tables in project {}", quoted(&params.project_id)),
        );
        invocation
            .run(async {
                let project = require_id(&params.project_id, "project ID")?;
                let location = params
                    .location
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty());

                let datasets_doc = fetch_document(
                    upstream,
                    request(config, &["projects", &project, "datasets"]),
                )
                .await?;

                let dataset_ids: Vec<String> = extract_all(&datasets_doc, DATASETS)
                    .into_iter()
                    .filter(|dataset| match location {
                        Some(wanted) => dataset
                            .get(DATASET_LOCATION)
                            .is_some_and(|l| l.eq_ignore_ascii_case(wanted)),
                        None => true,
                    })
                    .filter_map(|dataset| dataset.get(DATASET_ID))
                    .collect();

                if dataset_ids.is_empty() {
                    return Ok(Outcome::NotFound(match location {
                        Some(wanted) => format!(
                            "No datasets found in project {} in location {}.",
                            project, wanted
                        ),
                        None => format!("No datasets found in project {}.", project),
                    }));
                }

                let mut lines = Vec::new();
                for dataset_id in &dataset_ids {
                    debug!(dataset = %dataset_id, "Listing tables");
                    let tables_doc = fetch_document(
                        upstream,
                        request(
                            config,
                            &["projects", &project, "datasets", dataset_id, "tables"],
                        ),
                    )
                    .await?;

                    lines.push(format!("Dataset: {}", dataset_id));
                    let table_ids: Vec<String> = extract_all(&tables_doc, TABLES)
                        .into_iter()
                        .filter_map(|table| table.get(TABLE_ID))
                        .collect();
                    if table_ids.is_empty() {
                        lines.push("  No tables found in this dataset.".to_string());
                    } else {
                        lines.extend(table_ids.iter().map(|id| format!("  - Table: {}", id)));
                    }
                }

                Ok(Outcome::Found(lines.join("\n")))
            })
            .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: ListTablesParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments: {}", e))?;
        let upstream = HttpUpstream::new();
        let result = Self::execute(&params, &upstream, &config).await;
        Ok(crate::domains::tools::definitions::common::call_result_json(
            result.into_call_result(),
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<ListTablesParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: ListTablesParams = parse_arguments(args)?;
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
    use crate::domains::tools::pipeline::{ResultStatus, UpstreamResult};

    const DATASETS_BODY: &str = r#"{
        "kind": "bigquery#datasetList",
        "datasets": [
            {"id": "p:sales", "datasetReference": {"projectId": "p", "datasetId": "sales"}, "location": "US"},
            {"id": "p:empty", "datasetReference": {"projectId": "p", "datasetId": "empty"}, "location": "europe-west2"}
        ]
    }"#;

    fn params(project: &str, location: Option<&str>) -> ListTablesParams {
        ListTablesParams {
            project_id: project.to_string(),
            location: location.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_lists_datasets_and_tables_in_order() {
        let upstream = ScriptedUpstream::new()
            .json(DATASETS_BODY)
            .json(
                r#"{"tables": [
                    {"tableReference": {"tableId": "orders"}},
                    {"tableReference": {"tableId": "customers"}}
                ]}"#,
            )
            .json(r#"{"kind": "bigquery#tableList", "totalItems": 0}"#);

        let text = ListTablesTool::execute(&params("p", None), &upstream, &Config::default()).await;

        assert_eq!(text.status(), ResultStatus::Found);
        assert_eq!(
            text.text(),
            "Dataset: sales\n  - Table: orders\n  - Table: customers\nDataset: empty\n  No tables found in this dataset."
        );

        let requests = upstream.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].url.ends_with("/projects/p/datasets"));
        assert!(requests[1].url.ends_with("/projects/p/datasets/sales/tables"));
        assert!(requests[2].url.ends_with("/projects/p/datasets/empty/tables"));
    }

    #[tokio::test]
    async fn test_location_filter_ignores_case() {
        let upstream = ScriptedUpstream::new()
            .json(DATASETS_BODY)
            .json(r#"{"tables": [{"tableReference": {"tableId": "orders"}}]}"#);

        let text =
            ListTablesTool::execute(&params("p", Some("us")), &upstream, &Config::default()).await;

        assert_eq!(text.text(), "Dataset: sales\n  - Table: orders");
        assert_eq!(upstream.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_no_datasets() {
        let upstream = ScriptedUpstream::new().json(r#"{"kind": "bigquery#datasetList"}"#);
        let text =
            ListTablesTool::execute(&params("empty-project", None), &upstream, &Config::default())
                .await;
        assert_eq!(text.text(), "No datasets found in project empty-project.");
        assert_eq!(text.status(), ResultStatus::NotFound);
    }

    #[tokio::test]
    async fn test_no_datasets_in_location() {
        let upstream = ScriptedUpstream::new().json(DATASETS_BODY);
        let text =
            ListTablesTool::execute(&params("p", Some("asia-east1")), &upstream, &Config::default())
                .await;
        assert_eq!(
            text.text(),
            "No datasets found in project p in location asia-east1."
        );
    }

    #[tokio::test]
    async fn test_http_error_names_the_project() {
        let upstream = ScriptedUpstream::new().respond(UpstreamResult::HttpError {
            status: 403,
            body: "Access Denied".to_string(),
        });
        let text =
            ListTablesTool::execute(&params("secret", None), &upstream, &Config::default()).await;
        assert_eq!(
            text.text(),
            "Error listing tables in project 'secret': HTTP error 403: Access Denied"
        );
        assert_eq!(text.status(), ResultStatus::Failed);
    }

    #[tokio::test]
    async fn test_malformed_table_list_names_the_project() {
        let upstream = ScriptedUpstream::new().json(DATASETS_BODY).json("{not json");
        let text = ListTablesTool::execute(&params("p", None), &upstream, &Config::default()).await;
        assert_eq!(text.status(), ResultStatus::Failed);
        assert!(text.text().starts_with("Error listing tables in project 'p':"));
    }

    #[test]
    fn test_location_is_optional() {
        let params: ListTablesParams = serde_json::from_str(r#"{"project_id": "p"}"#).unwrap();
        assert!(params.location.is_none());
    }
}
