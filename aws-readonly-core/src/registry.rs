//! Static tool catalog.

use serde::Serialize;
use serde_json::Value;

use crate::tool::{DynTool, ToolError};

/// Discovery record for one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Misconfiguration detected while building the catalog. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool '{0}' is registered more than once")]
    DuplicateTool(String),

    #[error("Tool names must not be empty")]
    EmptyName,

    #[error("Input schema for tool '{0}' is not a JSON object")]
    InvalidSchema(String),
}

/// Tools by name, plus their descriptors computed once at construction.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn DynTool>>,
    descriptors: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a fixed tool table.
    pub fn with_tools(tools: Vec<Box<dyn DynTool>>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, tool: Box<dyn DynTool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.get(&name).is_some() {
            return Err(RegistryError::DuplicateTool(name));
        }

        let input_schema = tool.input_schema();
        if !input_schema.is_object() {
            return Err(RegistryError::InvalidSchema(name));
        }

        self.descriptors.push(ToolDescriptor {
            name,
            description: tool.description().to_string(),
            input_schema,
        });
        self.tools.push(tool);
        Ok(())
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&dyn DynTool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate raw arguments for `name` and return them with defaults filled in.
    pub fn validate(&self, name: &str, raw: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        Ok(tool.validate_raw(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{require_non_empty, ValidateInput, ValidationError};
    use crate::session::SessionManager;
    use crate::tool::{box_tool, Tool, ToolResult};
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, Serialize, JsonSchema)]
    struct NameInput {
        name: String,
        #[serde(default)]
        loud: bool,
    }

    impl ValidateInput for NameInput {
        fn validate(&self) -> Result<(), ValidationError> {
            require_non_empty("name", &self.name)
        }
    }

    struct Greeter(&'static str);

    impl Tool for Greeter {
        type Input = NameInput;

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Greets"
        }

        async fn execute(
            &self,
            input: Self::Input,
            _session: &SessionManager,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::new(Value::String(format!("hello {}", input.name))))
        }
    }

    #[test]
    fn test_descriptors_follow_registration_order() {
        let registry = ToolRegistry::with_tools(crate::box_tools![Greeter("b"), Greeter("a")])
            .unwrap();
        let names: Vec<_> = registry.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.descriptors()[0].input_schema["type"], "object");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ToolRegistry::with_tools(vec![box_tool(Greeter("x")), box_tool(Greeter("x"))])
            .err()
            .unwrap();
        assert_eq!(err, RegistryError::DuplicateTool("x".to_string()));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ToolRegistry::with_tools(vec![box_tool(Greeter(""))]).err().unwrap();
        assert_eq!(err, RegistryError::EmptyName);
    }

    #[test]
    fn test_validate_fills_defaults() {
        let registry = ToolRegistry::with_tools(vec![box_tool(Greeter("greet"))]).unwrap();
        let validated = registry
            .validate("greet", serde_json::json!({"name": "ada"}))
            .unwrap();
        assert_eq!(validated, serde_json::json!({"name": "ada", "loud": false}));
    }

    #[test]
    fn test_validate_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.validate("missing", Value::Null).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "missing"));
    }

    #[test]
    fn test_validate_reports_rule() {
        let registry = ToolRegistry::with_tools(vec![box_tool(Greeter("greet"))]).unwrap();
        let err = registry
            .validate("greet", serde_json::json!({"name": ""}))
            .unwrap_err();
        assert_eq!(err.to_string(), "name: must not be empty");
    }
}
