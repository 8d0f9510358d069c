use crate::prelude::*;

/// Input for the caller identity lookup. Takes no arguments.
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct CallerIdentityInput {}

impl ValidateInput for CallerIdentityInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Tool reporting the principal behind the credential issuer
pub struct CallerIdentityTool;

impl Tool for CallerIdentityTool {
    type Input = CallerIdentityInput;

    fn name(&self) -> &str {
        "get_caller_identity"
    }

    fn description(&self) -> &str {
        "Get the AWS account, user ID and ARN of the credentials currently in use, \
         including an assumed role"
    }

    async fn execute(
        &self,
        _input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!("Tool: get_caller_identity");
        let identity = session.caller_identity().await?;
        Ok(ToolResult::json(identity)?)
    }
}
