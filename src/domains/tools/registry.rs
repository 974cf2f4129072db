//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The fixed set of tools ([`ToolKind`])
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;

use super::definitions::{
    DescribeTableTool, GetIcd10CodeTool, GetMedicalTermTool, ListCocktailsByFirstLetterTool,
    ListRandomCocktailsTool, ListTablesTool, LookupCocktailDetailsByIdTool,
    SearchCocktailByNameTool, SearchIngredientByNameTool,
};
#[cfg(feature = "http")]
use super::ToolError;

/// Every tool this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ListTables,
    DescribeTable,
    SearchCocktailByName,
    ListCocktailsByFirstLetter,
    SearchIngredientByName,
    ListRandomCocktails,
    LookupCocktailDetailsById,
    GetMedicalTerm,
    GetIcd10Code,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::ListTables,
        ToolKind::DescribeTable,
        ToolKind::SearchCocktailByName,
        ToolKind::ListCocktailsByFirstLetter,
        ToolKind::SearchIngredientByName,
        ToolKind::ListRandomCocktails,
        ToolKind::LookupCocktailDetailsById,
        ToolKind::GetMedicalTerm,
        ToolKind::GetIcd10Code,
    ];

    /// Registered MCP name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ListTables => ListTablesTool::NAME,
            Self::DescribeTable => DescribeTableTool::NAME,
            Self::SearchCocktailByName => SearchCocktailByNameTool::NAME,
            Self::ListCocktailsByFirstLetter => ListCocktailsByFirstLetterTool::NAME,
            Self::SearchIngredientByName => SearchIngredientByNameTool::NAME,
            Self::ListRandomCocktails => ListRandomCocktailsTool::NAME,
            Self::LookupCocktailDetailsById => LookupCocktailDetailsByIdTool::NAME,
            Self::GetMedicalTerm => GetMedicalTermTool::NAME,
            Self::GetIcd10Code => GetIcd10CodeTool::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Tool model (metadata) for this kind.
    pub fn to_tool(self) -> Tool {
        match self {
            Self::ListTables => ListTablesTool::to_tool(),
            Self::DescribeTable => DescribeTableTool::to_tool(),
            Self::SearchCocktailByName => SearchCocktailByNameTool::to_tool(),
            Self::ListCocktailsByFirstLetter => ListCocktailsByFirstLetterTool::to_tool(),
            Self::SearchIngredientByName => SearchIngredientByNameTool::to_tool(),
            Self::ListRandomCocktails => ListRandomCocktailsTool::to_tool(),
            Self::LookupCocktailDetailsById => LookupCocktailDetailsByIdTool::to_tool(),
            Self::GetMedicalTerm => GetMedicalTermTool::to_tool(),
            Self::GetIcd10Code => GetIcd10CodeTool::to_tool(),
        }
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
pub struct ToolRegistry {
    /// Passed to each tool's HTTP handler.
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    config: Arc<Config>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        ToolKind::ALL.into_iter().map(ToolKind::name).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        ToolKind::ALL.into_iter().map(ToolKind::to_tool).collect()
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let Some(kind) = ToolKind::from_name(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::unknown_tool(name).to_string());
        };

        let config = self.config.clone();
        match kind {
            ToolKind::ListTables => ListTablesTool::http_handler(arguments, config).await,
            ToolKind::DescribeTable => DescribeTableTool::http_handler(arguments, config).await,
            ToolKind::SearchCocktailByName => {
                SearchCocktailByNameTool::http_handler(arguments, config).await
            }
            ToolKind::ListCocktailsByFirstLetter => {
                ListCocktailsByFirstLetterTool::http_handler(arguments, config).await
            }
            ToolKind::SearchIngredientByName => {
                SearchIngredientByNameTool::http_handler(arguments, config).await
            }
            ToolKind::ListRandomCocktails => {
                ListRandomCocktailsTool::http_handler(arguments, config).await
            }
            ToolKind::LookupCocktailDetailsById => {
                LookupCocktailDetailsByIdTool::http_handler(arguments, config).await
            }
            ToolKind::GetMedicalTerm => GetMedicalTermTool::http_handler(arguments, config).await,
            ToolKind::GetIcd10Code => GetIcd10CodeTool::http_handler(arguments, config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_config());
        let names = registry.tool_names();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&"list_tables"));
        assert!(names.contains(&"describe_table"));
        assert!(names.contains(&"search_cocktail_by_name"));
        assert!(names.contains(&"list_cocktails_by_first_letter"));
        assert!(names.contains(&"search_ingredient_by_name"));
        assert!(names.contains(&"list_random_cocktails"));
        assert!(names.contains(&"lookup_cocktail_details_by_id"));
        assert!(names.contains(&"get_medical_term"));
        assert!(names.contains(&"get_icd_10_code"));
    }

    #[test]
    fn test_tool_kind_round_trips_names() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("fs_delete"), None);
    }

    #[test]
    fn test_all_tools_have_object_schemas() {
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), ToolKind::ALL.len());
        for tool in tools {
            assert!(tool.description.is_some());
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&serde_json::json!("object"))
            );
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_config());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert_eq!(result.unwrap_err(), "Tool not found: unknown");
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_rejects_bad_arguments() {
        let registry = ToolRegistry::new(test_config());
        let result = registry
            .call_tool("get_icd_10_code", serde_json::json!({ "code": "A15" }))
            .await;
        assert!(result.unwrap_err().starts_with("Invalid arguments"));
    }
}
