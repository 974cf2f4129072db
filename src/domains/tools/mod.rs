//! Tools domain module.
//!
//! Every tool queries one upstream service and returns a single text value.
//!
//! ## Architecture
//!
//! - `pipeline/` - Shared request, parse, extract, format and containment stages
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - The fixed tool set and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/<service>/`
//! 2. Define params, execute(), and http_handler()
//! 3. Export in `definitions/mod.rs`
//! 4. Add a `ToolKind` variant in `registry.rs`
//! 5. Add route in `router.rs` using `with_route()`

pub mod definitions;
mod error;
pub mod pipeline;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::{ToolKind, ToolRegistry};
pub use router::build_tool_router;
