//! Tool dispatch and the response envelope.
//!
//! [`Dispatcher::dispatch`] always produces a [`ToolResponse`]. Failures of any
//! kind (unknown tool, bad arguments, adapter errors) become an error envelope;
//! nothing propagates to the transport.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::registry::{ToolDescriptor, ToolRegistry};
use crate::session::SessionManager;
use crate::tool::{ToolError, ToolResult};

/// Uniform response wrapper returned for every tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    /// Serialized result, or serialized `{"error": <message>}`.
    pub content: String,
    pub is_error: bool,
}

impl ToolResponse {
    pub fn success(result: &ToolResult) -> Self {
        Self {
            content: result.as_text(),
            is_error: false,
        }
    }

    pub fn failure(error: &ToolError) -> Self {
        let payload = serde_json::json!({ "error": error.to_string() });
        Self {
            content: serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|_| payload.to_string()),
            is_error: true,
        }
    }

    /// Total mapping from a handler outcome to an envelope.
    pub fn from_outcome(outcome: &Result<ToolResult, ToolError>) -> Self {
        match outcome {
            Ok(result) => Self::success(result),
            Err(error) => Self::failure(error),
        }
    }

    /// Parse the content back into JSON.
    pub fn payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.content)
    }
}

/// Routes tool calls to handlers.
///
/// Holds the catalog and the session handle every handler receives.
pub struct Dispatcher {
    registry: ToolRegistry,
    session: Arc<SessionManager>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, session: Arc<SessionManager>) -> Self {
        Self { registry, session }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// The discovery catalog.
    pub fn list_tools(&self) -> &[ToolDescriptor] {
        self.registry.descriptors()
    }

    /// Run `name` with `arguments` and wrap the outcome.
    ///
    /// `None` arguments are treated as an empty object.
    pub async fn dispatch(&self, name: &str, arguments: Option<Value>) -> ToolResponse {
        let started = Instant::now();
        let outcome = self.run(name, arguments.unwrap_or(Value::Null)).await;

        match &outcome {
            Ok(_) => tracing::debug!(
                tool = name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Tool call completed"
            ),
            Err(e) => tracing::error!(tool = name, error = %e, "Tool execution error"),
        }

        ToolResponse::from_outcome(&outcome)
    }

    async fn run(&self, name: &str, arguments: Value) -> Result<ToolResult, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute_raw(arguments, &self.session).await
    }
}
