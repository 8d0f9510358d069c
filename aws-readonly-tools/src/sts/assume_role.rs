use crate::prelude::*;
use aws_readonly_core::schema::{
    default_session_duration, MAX_SESSION_DURATION, MIN_SESSION_DURATION,
};
use aws_readonly_core::{format_timestamp, AssumedCredentials};

/// Input for assuming a role
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssumeRoleInput {
    /// The ARN of the IAM role to assume
    #[schemars(length(min = 1))]
    pub role_arn: String,

    /// The duration in seconds for the session (900-43200)
    #[serde(default = "default_session_duration")]
    #[schemars(range(min = 900, max = 43200))]
    pub session_duration: i64,
}

impl ValidateInput for AssumeRoleInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("roleArn", &self.role_arn)?;
        require_range(
            "sessionDuration",
            self.session_duration,
            MIN_SESSION_DURATION,
            MAX_SESSION_DURATION,
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsOutput {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssumeRoleOutput {
    message: String,
    role_arn: String,
    credentials: CredentialsOutput,
}

impl AssumeRoleOutput {
    fn new(role_arn: String, assumed: AssumedCredentials) -> Self {
        Self {
            message: format!(
                "Assumed role {}. Subsequent S3 and IAM calls use these credentials.",
                role_arn
            ),
            role_arn,
            credentials: CredentialsOutput {
                access_key_id: assumed.credentials.access_key_id,
                secret_access_key: assumed.credentials.secret_access_key,
                session_token: assumed.credentials.session_token,
                expiration: format_timestamp(&assumed.expiration),
            },
        }
    }
}

/// Tool for assuming an IAM role and switching the session to it
pub struct AssumeRoleTool;

impl Tool for AssumeRoleTool {
    type Input = AssumeRoleInput;

    fn name(&self) -> &str {
        "assume_iam_role"
    }

    fn description(&self) -> &str {
        "Assume an IAM role and get temporary security credentials"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(role_arn = %input.role_arn, "Tool: assume_iam_role");
        let duration = narrow(
            "sessionDuration",
            input.session_duration,
            MIN_SESSION_DURATION,
            MAX_SESSION_DURATION,
        )?;
        let assumed = session.assume_role(&input.role_arn, duration).await?;
        Ok(ToolResult::json(AssumeRoleOutput::new(input.role_arn, assumed))?)
    }
}
