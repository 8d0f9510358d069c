use std::future::Future;
use std::pin::Pin;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::provider::ProviderError;
use crate::schema::{parse_input, ValidateInput, ValidationError};
use crate::session::SessionManager;

/// Structured JSON payload returned by a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolResult(Value);

impl ToolResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Create a result from any serializable type
    pub fn json<T: Serialize>(value: T) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::to_value(value)?))
    }

    /// Render the result as the text carried in a response envelope.
    ///
    /// Pretty-printed with two-space indentation.
    pub fn as_text(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

/// Errors that can occur during tool execution.
///
/// Each variant corresponds to one failure kind a caller can see in an error
/// envelope. The `Display` text is what ends up in the envelope payload.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Caller-supplied arguments failed their input contract
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The adapter call failed, or the named resource does not exist
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No tool is registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A handler result could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for implementing tools exposed to a calling agent.
///
/// Tools define an input type with `#[derive(Deserialize, Serialize, JsonSchema)]`
/// so the advertised JSON schema and the defaults applied during validation
/// come from the same declaration. [`ValidateInput`] adds the rules serde
/// cannot express (non-empty strings, numeric bounds).
///
/// Handlers receive the [`SessionManager`] for the call. A handler that talks
/// to storage or identity adapters should take one snapshot with
/// [`SessionManager::adapters`] and use it for the whole call.
///
/// # Example
///
/// ```rust
/// use aws_readonly_core::schema::{require_non_empty, ValidateInput, ValidationError};
/// use aws_readonly_core::{SessionManager, Tool, ToolError, ToolResult};
/// use schemars::JsonSchema;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize, Serialize, JsonSchema)]
/// struct EchoInput {
///     message: String,
/// }
///
/// impl ValidateInput for EchoInput {
///     fn validate(&self) -> Result<(), ValidationError> {
///         require_non_empty("message", &self.message)
///     }
/// }
///
/// struct EchoTool;
///
/// impl Tool for EchoTool {
///     type Input = EchoInput;
///
///     fn name(&self) -> &str { "echo" }
///     fn description(&self) -> &str { "Echo a message back" }
///
///     async fn execute(
///         &self,
///         input: Self::Input,
///         _session: &SessionManager,
///     ) -> Result<ToolResult, ToolError> {
///         Ok(ToolResult::json(serde_json::json!({ "message": input.message }))?)
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The input type for this tool.
    type Input: DeserializeOwned + Serialize + JsonSchema + ValidateInput + Send;

    /// The name of the tool (e.g., "list_s3_buckets")
    fn name(&self) -> &str;

    /// A description of what the tool does
    fn description(&self) -> &str;

    /// Execute the tool with validated input
    fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> impl Future<Output = Result<ToolResult, ToolError>> + Send;

    /// Get the JSON schema for this tool's input.
    ///
    /// Generated from the `JsonSchema` derive on `Input`.
    fn input_schema(&self) -> Value {
        schemars::schema_for!(Self::Input).to_value()
    }
}

/// Boxed future returned by [`DynTool::execute_raw`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<ToolResult, ToolError>> + Send + 'a>>;

/// Object-safe trait for dynamic tool dispatch (used by the registry).
///
/// Implement `Tool` instead and use `box_tool()` to convert.
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;

    /// Check raw arguments against the input contract and return them with
    /// defaults filled in. Never touches a provider.
    fn validate_raw(&self, input: Value) -> Result<Value, ValidationError>;

    fn execute_raw<'a>(&'a self, input: Value, session: &'a SessionManager) -> ToolFuture<'a>;
}

/// Convert a `Tool` into a type-erased `Box<dyn DynTool>` for storage in collections.
pub fn box_tool<T: Tool + 'static>(tool: T) -> Box<dyn DynTool> {
    Box::new(ToolWrapper(tool))
}

/// Create a `Vec<Box<dyn DynTool>>` from heterogeneous tool types.
///
/// ```ignore
/// let registry = ToolRegistry::with_tools(box_tools![ListBucketsTool, GetUserTool])?;
/// ```
#[macro_export]
macro_rules! box_tools {
    ($($tool:expr),* $(,)?) => {
        vec![$($crate::tool::box_tool($tool)),*]
    };
}

/// Internal wrapper that implements DynTool for any Tool
struct ToolWrapper<T>(T);

impl<T: Tool + 'static> DynTool for ToolWrapper<T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn description(&self) -> &str {
        self.0.description()
    }

    fn input_schema(&self) -> Value {
        self.0.input_schema()
    }

    fn validate_raw(&self, input: Value) -> Result<Value, ValidationError> {
        let typed: T::Input = parse_input(input)?;
        serde_json::to_value(typed).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    fn execute_raw<'a>(&'a self, input: Value, session: &'a SessionManager) -> ToolFuture<'a> {
        Box::pin(async move {
            let typed: T::Input = parse_input(input)?;
            self.0.execute(typed, session).await
        })
    }
}
