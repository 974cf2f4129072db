//! Error containment boundary.
//!
//! Every tool runs its request/parse/extract/format chain inside an
//! [`Invocation`]. Whatever the chain returns, including a panic, comes
//! out as a non-empty [`FormattedText`].

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, info, warn};

use super::format::{FormattedText, ResultStatus};
use crate::domains::tools::ToolError;

/// Successful result of a tool chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The upstream data, rendered.
    Found(String),
    /// A well-formed response with no matching entity.
    NotFound(String),
}

/// Lifecycle of one invocation. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// One tool call, scoped to a single request.
#[derive(Debug)]
pub struct Invocation {
    tool: &'static str,
    action: String,
    state: InvocationState,
}

impl Invocation {
    /// `action` completes the sentence "Error ...", e.g.
    /// `searching cocktails by name 'Margarita'`.
    pub fn new(tool: &'static str, action: impl Into<String>) -> Self {
        Self {
            tool,
            action: action.into(),
            state: InvocationState::Idle,
        }
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Drive `work` to completion and render its result.
    ///
    /// An invocation runs once; calling this again on a finished invocation
    /// returns a failure without polling `work`.
    pub async fn run<F>(&mut self, work: F) -> FormattedText
    where
        F: Future<Output = Result<Outcome, ToolError>>,
    {
        if self.state != InvocationState::Idle {
            warn!(tool = self.tool, state = ?self.state, "Invocation already finished");
            return FormattedText::new(
                format!("Error {}: invocation already finished", self.action),
                ResultStatus::Failed,
            );
        }

        self.state = InvocationState::InFlight;
        debug!(tool = self.tool, "Invocation in flight");

        let result = match AssertUnwindSafe(work).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(ToolError::internal(panic_message(panic))),
        };

        let formatted = match result {
            Ok(Outcome::Found(text)) => {
                info!(tool = self.tool, "Invocation succeeded");
                FormattedText::new(text, ResultStatus::Found)
            }
            Ok(Outcome::NotFound(text)) => {
                info!(tool = self.tool, "Invocation found no results");
                FormattedText::new(text, ResultStatus::NotFound)
            }
            Err(err) => {
                warn!(
                    tool = self.tool,
                    category = err.category(),
                    "Invocation failed: {}",
                    err
                );
                FormattedText::new(self.describe_failure(&err), ResultStatus::Failed)
            }
        };

        self.state = match formatted.status() {
            ResultStatus::Failed => InvocationState::Failed,
            ResultStatus::Found | ResultStatus::NotFound => InvocationState::Succeeded,
        };

        self.ensure_non_empty(formatted)
    }

    fn describe_failure(&self, err: &ToolError) -> String {
        match err {
            ToolError::InvalidArguments(message) => message.clone(),
            other => format!("Error {}: {}", self.action, other),
        }
    }

    fn ensure_non_empty(&self, formatted: FormattedText) -> FormattedText {
        if !formatted.text().trim().is_empty() {
            return formatted;
        }
        match formatted.status() {
            ResultStatus::Failed => {
                FormattedText::new(format!("Error {}.", self.action), ResultStatus::Failed)
            }
            ResultStatus::Found | ResultStatus::NotFound => FormattedText::new(
                format!("No content returned while {}.", self.action),
                ResultStatus::NotFound,
            ),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool panicked".to_string()
    }
}
