//! Text formatter.
//!
//! Deterministic line-oriented rendering shared by every tool. Field order
//! comes from the record; absent values render as [`NOT_AVAILABLE`].

use rmcp::model::{CallToolResult, Content};

use super::extract::{ExtractedRecord, IndexedPair};

/// Placeholder for an absent optional field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Separator placed between per-item blocks.
pub const BLOCK_SEPARATOR: &str = "\n---\n";

/// How a tool invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// The upstream service had the requested data.
    Found,
    /// A well-formed response with nothing in it.
    NotFound,
    /// Validation, transport, parse or internal failure.
    Failed,
}

/// The single text value a tool returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedText {
    text: String,
    status: ResultStatus,
}

impl FormattedText {
    pub fn new(text: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    /// Convert into an MCP tool result. Failures set `is_error`.
    pub fn into_call_result(self) -> CallToolResult {
        match self.status {
            ResultStatus::Failed => CallToolResult::error(vec![Content::text(self.text)]),
            ResultStatus::Found | ResultStatus::NotFound => {
                CallToolResult::success(vec![Content::text(self.text)])
            }
        }
    }
}

pub fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// `Label: value` lines in record order.
pub fn labeled_lines(record: &ExtractedRecord) -> Vec<String> {
    record
        .fields()
        .iter()
        .map(|(label, value)| format!("{}: {}", label, or_na(value.as_deref())))
        .collect()
}

/// `Label: value` lines joined into one block.
pub fn labeled_block(record: &ExtractedRecord) -> String {
    labeled_lines(record).join("\n")
}

/// `Label: value, Label: value` on a single line.
pub fn inline_record(record: &ExtractedRecord) -> String {
    labeled_lines(record).join(", ")
}

/// Join item blocks with a line containing only `---`.
pub fn join_blocks<I>(blocks: I) -> String
where
    I: IntoIterator<Item = String>,
{
    blocks.into_iter().collect::<Vec<_>>().join(BLOCK_SEPARATOR)
}

/// Render indexed pairs as `secondary primary` (or `primary` alone when the
/// slot has no secondary value), comma separated, in slot order.
pub fn join_pairs(pairs: &[IndexedPair]) -> String {
    pairs
        .iter()
        .map(|pair| match &pair.secondary {
            Some(secondary) => format!("{} {}", secondary, pair.primary),
            None => pair.primary.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
