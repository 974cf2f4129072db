//! BigQuery metadata tools module.
//!
//! - `list_tables`: datasets and their tables in a project
//! - `describe_table`: metadata and schema of one table

pub mod common;
pub mod describe_table;
pub mod list_tables;

pub use describe_table::{DescribeTableParams, DescribeTableTool};
pub use list_tables::{ListTablesParams, ListTablesTool};
