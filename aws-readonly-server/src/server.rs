//! MCP protocol surface over stdio.
//!
//! [`AwsReadonlyServer`] answers `tools/list` from the registry descriptors
//! and forwards `tools/call` to the [`Dispatcher`]. Tool failures are
//! returned as results with `isError` set, never as protocol errors.

use std::sync::Arc;

use aws_readonly_core::{Dispatcher, ToolDescriptor, ToolResponse};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;

use crate::error::{ServerError, ServerResult};

pub const SERVER_NAME: &str = "aws-readonly-server";

const INSTRUCTIONS: &str = "Read-only access to AWS S3 and IAM. \
Use assume_iam_role to switch credentials; later calls use the assumed role.";

/// Protocol handler wrapping a [`Dispatcher`].
#[derive(Clone)]
pub struct AwsReadonlyServer {
    dispatcher: Arc<Dispatcher>,
    tools: Arc<Vec<Tool>>,
}

impl AwsReadonlyServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        let tools = dispatcher.list_tools().iter().map(to_mcp_tool).collect();
        Self {
            dispatcher,
            tools: Arc::new(tools),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Tool catalog as advertised to clients.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Execute one `tools/call` request.
    pub async fn handle_call(&self, request: CallToolRequestParam) -> CallToolResult {
        let arguments = request.arguments.map(Value::Object);
        let response = self.dispatcher.dispatch(&request.name, arguments).await;
        to_call_result(response)
    }

    /// Serve over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> ServerResult<()> {
        tracing::info!(tools = self.tools.len(), "Serving MCP over stdio");

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        tracing::info!(?reason, "MCP session ended");
        Ok(())
    }
}

impl ServerHandler for AwsReadonlyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools.to_vec()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.handle_call(request).await)
    }
}

fn to_mcp_tool(descriptor: &ToolDescriptor) -> Tool {
    let schema: JsonObject = match &descriptor.input_schema {
        Value::Object(map) => map.clone(),
        // Registry construction rejects non-object schemas.
        _ => JsonObject::new(),
    };
    Tool::new(
        descriptor.name.clone(),
        descriptor.description.clone(),
        Arc::new(schema),
    )
}

fn to_call_result(response: ToolResponse) -> CallToolResult {
    let content = vec![Content::text(response.content)];
    if response.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_readonly_core::test_utils::{MockAdapterFactory, MockIdentity, MockIssuer, MockStorage};
    use aws_readonly_core::{SessionManager, ToolRegistry};

    fn server(storage: MockStorage) -> AwsReadonlyServer {
        let factory = MockAdapterFactory::new()
            .with_storage(storage)
            .with_identity(MockIdentity::new());
        let session = SessionManager::new(Arc::new(factory), Arc::new(MockIssuer::new()));
        let registry = ToolRegistry::with_tools(aws_readonly_tools::all_tools()).unwrap();
        AwsReadonlyServer::new(Arc::new(Dispatcher::new(registry, Arc::new(session))))
    }

    fn call(name: &str, arguments: Value) -> CallToolRequestParam {
        CallToolRequestParam {
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
        }
    }

    fn text(result: &CallToolResult) -> &str {
        result.content[0]
            .as_text()
            .map(|t| t.text.as_str())
            .unwrap()
    }

    #[test]
    fn test_tools_mirror_registry() {
        let server = server(MockStorage::new());
        let names: Vec<&str> = server.tools().iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, server.dispatcher().registry().names());

        let list_objects = server
            .tools()
            .iter()
            .find(|t| t.name == "list_s3_objects")
            .unwrap();
        assert_eq!(list_objects.input_schema["type"], "object");
        assert!(list_objects.input_schema.contains_key("properties"));
    }

    #[test]
    fn test_server_info_advertises_tools() {
        let info = server(MockStorage::new()).get_info();
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_call_success_is_not_error() {
        let server = server(MockStorage::new().with_bucket("logs"));
        let result = server
            .handle_call(call("list_s3_buckets", serde_json::json!({})))
            .await;

        assert_eq!(result.is_error, Some(false));
        let payload: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(payload["count"], 1);
        assert_eq!(payload["buckets"][0]["name"], "logs");
    }

    #[tokio::test]
    async fn test_missing_arguments_treated_as_empty() {
        let server = server(MockStorage::new());
        let result = server
            .handle_call(CallToolRequestParam {
                name: "list_s3_buckets".into(),
                arguments: None,
            })
            .await;
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let server = server(MockStorage::new());
        let result = server
            .handle_call(call("delete_bucket", serde_json::json!({})))
            .await;

        assert_eq!(result.is_error, Some(true));
        let payload: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(payload["error"], "Unknown tool: delete_bucket");
    }
}
