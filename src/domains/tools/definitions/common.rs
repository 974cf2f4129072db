//! Helpers shared by every tool definition.

use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Build the MCP tool model for a parameter type.
pub fn tool_model<P>(name: &'static str, description: &'static str) -> Tool
where
    P: JsonSchema + 'static,
{
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Deserialize tool arguments, rejecting missing or unknown ones.
pub fn parse_arguments<P>(arguments: JsonObject) -> Result<P, McpError>
where
    P: DeserializeOwned,
{
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

/// JSON body returned by the HTTP transport for a tool call.
#[cfg(feature = "http")]
pub fn call_result_json(result: rmcp::model::CallToolResult) -> serde_json::Value {
    serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    })
}

/// Quote a user-supplied value for messages, e.g. `'Margarita'`.
pub fn quoted(value: &str) -> String {
    format!("'{}'", value)
}
