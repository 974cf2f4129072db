//! Response normalization pipeline shared by every tool.
//!
//! Each tool instantiates the same chain:
//!
//! 1. build an [`UpstreamRequest`]
//! 2. [`Upstream::fetch`] it, getting an [`UpstreamResult`]
//! 3. [`parse`] the body into a [`ParsedDocument`] (and [`parse_nested`]
//!    where a field carries a second document)
//! 4. [`extract`] / [`extract_all`] the fields it needs
//! 5. render them with the helpers in [`format`]
//!
//! and runs it inside an [`Invocation`], which turns any failure into text.

pub mod containment;
pub mod extract;
pub mod format;
pub mod parse;
pub mod upstream;

#[cfg(test)]
pub(crate) mod scripted;

pub use containment::{Invocation, InvocationState, Outcome};
pub use extract::{
    ExtractedRecord, FieldPath, IndexedPair, Node, Segment, extract, extract_all, probe_indexed,
};
pub use format::{FormattedText, NOT_AVAILABLE, ResultStatus};
pub use parse::{ParseError, ParseScope, ParsedDocument, XmlElement, parse, parse_nested};
pub use upstream::{
    ContentType, HttpUpstream, QueryValue, Upstream, UpstreamRequest, UpstreamResult,
};

use crate::domains::tools::ToolError;

/// Fetch `request` and decode the body in its declared format.
pub async fn fetch_document(
    upstream: &dyn Upstream,
    request: UpstreamRequest,
) -> Result<ParsedDocument, ToolError> {
    let (body, content_type) = upstream.fetch(request).await.into_body()?;
    Ok(parse(&body, content_type)?)
}
