//! Handler dispatcher.
//!
//! Resolves a tool, validates its arguments, runs the handler and wraps the
//! outcome in a [`ResponseEnvelope`]. Every call walks
//! `Received -> Validating -> Executing -> Responded`, short-circuiting to
//! `Responded` on the first error. Nothing is kept between calls.

use std::fmt;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::arguments::{ArgumentBag, validate};
use super::error::ToolError;
use super::registry::ToolRegistry;

/// Lifecycle of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Received,
    Validating,
    Executing,
    Responded,
}

impl DispatchState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: DispatchState) -> bool {
        matches!(
            (self, next),
            (Self::Received, Self::Validating)
                | (Self::Validating, Self::Executing)
                | (Self::Received | Self::Validating | Self::Executing, Self::Responded)
        )
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Received => "received",
            Self::Validating => "validating",
            Self::Executing => "executing",
            Self::Responded => "responded",
        };
        f.write_str(s)
    }
}

/// The single outbound result of one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Success { content: String },
    Error { message: String },
}

impl ResponseEnvelope {
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The payload text, success or error.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { content } => content,
            Self::Error { message } => message,
        }
    }
}

impl From<Result<String, ToolError>> for ResponseEnvelope {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(content) => Self::success(content),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

impl From<ResponseEnvelope> for CallToolResult {
    fn from(envelope: ResponseEnvelope) -> Self {
        match envelope {
            ResponseEnvelope::Success { content } => {
                CallToolResult::success(vec![Content::text(content)])
            }
            ResponseEnvelope::Error { message } => {
                CallToolResult::error(vec![Content::text(message)])
            }
        }
    }
}

/// Tracks the state of one in-flight call.
struct Call<'a> {
    tool: &'a str,
    state: DispatchState,
}

impl<'a> Call<'a> {
    fn new(tool: &'a str) -> Self {
        debug!(tool, state = %DispatchState::Received, "Call received");
        Self {
            tool,
            state: DispatchState::Received,
        }
    }

    fn advance(&mut self, next: DispatchState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(tool = self.tool, from = %self.state, to = %next, "Call state");
        self.state = next;
    }
}

/// Dispatches tool calls against a shared registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run a call and always produce an envelope.
    #[instrument(skip_all, fields(tool = %tool_name))]
    pub fn dispatch(&self, tool_name: &str, bag: &ArgumentBag) -> ResponseEnvelope {
        let result = self.try_dispatch(tool_name, bag);
        if let Err(e) = &result {
            warn!("Tool '{}' failed: {}", tool_name, e);
        }
        ResponseEnvelope::from(result)
    }

    /// Run a call, keeping the error variant.
    pub fn try_dispatch(&self, tool_name: &str, bag: &ArgumentBag) -> Result<String, ToolError> {
        let mut call = Call::new(tool_name);
        let result = self.run(&mut call, bag);
        call.advance(DispatchState::Responded);
        result
    }

    fn run(&self, call: &mut Call<'_>, bag: &ArgumentBag) -> Result<String, ToolError> {
        let entry = self.registry.lookup(call.tool)?;

        call.advance(DispatchState::Validating);
        let args = validate(&entry.descriptor, bag)?;

        call.advance(DispatchState::Executing);
        entry.handler.execute(&args)
    }
}
