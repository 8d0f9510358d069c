use crate::prelude::*;
use aws_readonly_core::schema::{default_max_items, MAX_MAX_ITEMS, MIN_MAX_ITEMS};
use aws_readonly_core::UserInfo;

/// Input for listing users
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersInput {
    /// Maximum number of users to return
    #[serde(default = "default_max_items")]
    #[schemars(range(min = 1, max = 1000))]
    pub max_items: i64,
}

impl ValidateInput for ListUsersInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_range("maxItems", self.max_items, MIN_MAX_ITEMS, MAX_MAX_ITEMS)
    }
}

#[derive(Serialize)]
struct ListUsersOutput {
    users: Vec<UserInfo>,
    count: usize,
}

/// Tool for listing IAM users
pub struct ListUsersTool;

impl Tool for ListUsersTool {
    type Input = ListUsersInput;

    fn name(&self) -> &str {
        "list_iam_users"
    }

    fn description(&self) -> &str {
        "List IAM users in the AWS account"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(max_items = input.max_items, "Tool: list_iam_users");
        let adapters = session.adapters();
        let max_items = narrow("maxItems", input.max_items, MIN_MAX_ITEMS, MAX_MAX_ITEMS)?;
        let users = adapters.identity().list_users(max_items).await?;
        let count = users.len();
        Ok(ToolResult::json(ListUsersOutput { users, count })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_with;
    use aws_readonly_core::test_utils::{MockIdentity, MockStorage};

    #[tokio::test]
    async fn test_list_users_respects_max_items() {
        let identity = MockIdentity::new()
            .with_user_named("alice")
            .with_user_named("bob")
            .with_user_named("carol");
        let session = session_with(MockStorage::new(), identity.clone());

        let result = ListUsersTool
            .execute(ListUsersInput { max_items: 2 }, &session)
            .await
            .unwrap();
        let json = result.as_json();

        assert_eq!(json["count"], 2);
        assert_eq!(json["users"][1]["userName"], "bob");
        assert_eq!(json["users"][1]["userId"], "AIDABOB");
        assert!(json["users"][0].get("passwordLastUsed").is_none());
        assert_eq!(identity.calls()[0].args, serde_json::json!({"maxItems": 2}));
    }
}
