//! Lookup MCP Server Library
//!
//! An MCP server whose tools look things up in external services and return
//! one text result each:
//!
//! - BigQuery table metadata (`list_tables`, `describe_table`)
//! - TheCocktailDB drinks and ingredients
//! - MedlinePlus health topics (`get_medical_term`)
//! - NIH ICD-10-CM codes (`get_icd_10_code`)
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the MCP server and transports
//! - **domains::tools**: Tool definitions and the response pipeline they share
//!   (request, fetch, parse, extract, format, error containment)
//!
//! # Example
//!
//! ```rust,no_run
//! use lookup_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
