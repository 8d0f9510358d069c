use crate::prelude::*;

/// Input for looking up a role
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetRoleInput {
    /// The name of the IAM role
    #[schemars(length(min = 1))]
    pub role_name: String,
}

impl ValidateInput for GetRoleInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("roleName", &self.role_name)
    }
}

/// Tool for getting details of one IAM role
pub struct GetRoleTool;

impl Tool for GetRoleTool {
    type Input = GetRoleInput;

    fn name(&self) -> &str {
        "get_iam_role"
    }

    fn description(&self) -> &str {
        "Get details of a specific IAM role"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(role_name = %input.role_name, "Tool: get_iam_role");
        let adapters = session.adapters();
        let role = adapters.identity().get_role(&input.role_name).await?;
        Ok(ToolResult::json(role)?)
    }
}
