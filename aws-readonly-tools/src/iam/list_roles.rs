use crate::prelude::*;
use aws_readonly_core::schema::{default_max_items, MAX_MAX_ITEMS, MIN_MAX_ITEMS};
use aws_readonly_core::RoleInfo;

/// Input for listing roles
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListRolesInput {
    /// Maximum number of roles to return
    #[serde(default = "default_max_items")]
    #[schemars(range(min = 1, max = 1000))]
    pub max_items: i64,
}

impl ValidateInput for ListRolesInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_range("maxItems", self.max_items, MIN_MAX_ITEMS, MAX_MAX_ITEMS)
    }
}

#[derive(Serialize)]
struct ListRolesOutput {
    roles: Vec<RoleInfo>,
    count: usize,
}

/// Tool for listing IAM roles
pub struct ListRolesTool;

impl Tool for ListRolesTool {
    type Input = ListRolesInput;

    fn name(&self) -> &str {
        "list_iam_roles"
    }

    fn description(&self) -> &str {
        "List IAM roles in the AWS account"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(max_items = input.max_items, "Tool: list_iam_roles");
        let adapters = session.adapters();
        let max_items = narrow("maxItems", input.max_items, MIN_MAX_ITEMS, MAX_MAX_ITEMS)?;
        let roles = adapters.identity().list_roles(max_items).await?;
        let count = roles.len();
        Ok(ToolResult::json(ListRolesOutput { roles, count })?)
    }
}
