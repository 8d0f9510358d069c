use crate::prelude::*;

/// Input for looking up a user
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetUserInput {
    /// The name of the IAM user
    #[schemars(length(min = 1))]
    pub user_name: String,
}

impl ValidateInput for GetUserInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("userName", &self.user_name)
    }
}

/// Tool for getting details of one IAM user
pub struct GetUserTool;

impl Tool for GetUserTool {
    type Input = GetUserInput;

    fn name(&self) -> &str {
        "get_iam_user"
    }

    fn description(&self) -> &str {
        "Get details of a specific IAM user"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(user_name = %input.user_name, "Tool: get_iam_user");
        let adapters = session.adapters();
        let user = adapters.identity().get_user(&input.user_name).await?;
        Ok(ToolResult::json(user)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_with;
    use aws_readonly_core::test_utils::{MockIdentity, MockStorage};

    #[tokio::test]
    async fn test_get_user() {
        let session = session_with(MockStorage::new(), MockIdentity::new().with_user_named("ada"));

        let result = GetUserTool
            .execute(
                GetUserInput {
                    user_name: "ada".to_string(),
                },
                &session,
            )
            .await
            .unwrap();
        let json = result.as_json();

        assert_eq!(json["userName"], "ada");
        assert_eq!(json["arn"], "arn:aws:iam::123456789012:user/ada");
        assert_eq!(json["createDate"], "2024-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let session = session_with(MockStorage::new(), MockIdentity::new());

        let err = GetUserTool
            .execute(
                GetUserInput {
                    user_name: "ghost".to_string(),
                },
                &session,
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User ghost not found");
    }
}
