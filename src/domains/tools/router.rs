//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;

use super::definitions::{
    DescribeTableTool, GetIcd10CodeTool, GetMedicalTermTool, ListCocktailsByFirstLetterTool,
    ListRandomCocktailsTool, ListTablesTool, LookupCocktailDetailsByIdTool,
    SearchCocktailByNameTool, SearchIngredientByNameTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(config: Arc<Config>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(ListTablesTool::create_route(config.clone()))
        .with_route(DescribeTableTool::create_route(config.clone()))
        .with_route(SearchCocktailByNameTool::create_route(config.clone()))
        .with_route(ListCocktailsByFirstLetterTool::create_route(config.clone()))
        .with_route(SearchIngredientByNameTool::create_route(config.clone()))
        .with_route(ListRandomCocktailsTool::create_route(config.clone()))
        .with_route(LookupCocktailDetailsByIdTool::create_route(config.clone()))
        .with_route(GetMedicalTermTool::create_route(config.clone()))
        .with_route(GetIcd10CodeTool::create_route(config))
}
