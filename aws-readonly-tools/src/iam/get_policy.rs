use crate::prelude::*;

/// Input for looking up a managed policy
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPolicyInput {
    /// The ARN of the IAM policy
    #[schemars(length(min = 1))]
    pub policy_arn: String,
}

impl ValidateInput for GetPolicyInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("policyArn", &self.policy_arn)
    }
}

/// Tool for getting details of one managed policy
pub struct GetPolicyTool;

impl Tool for GetPolicyTool {
    type Input = GetPolicyInput;

    fn name(&self) -> &str {
        "get_iam_policy"
    }

    fn description(&self) -> &str {
        "Get details of a specific IAM policy"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(policy_arn = %input.policy_arn, "Tool: get_iam_policy");
        let adapters = session.adapters();
        let policy = adapters.identity().get_policy(&input.policy_arn).await?;
        Ok(ToolResult::json(policy)?)
    }
}
