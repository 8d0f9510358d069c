use crate::prelude::*;
use aws_readonly_core::schema::{default_max_items, MAX_MAX_ITEMS, MIN_MAX_ITEMS};
use aws_readonly_core::{PolicyInfo, PolicyScope};

/// Input for listing managed policies
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPoliciesInput {
    /// The scope of policies to list
    #[serde(default)]
    pub scope: PolicyScope,

    /// Maximum number of policies to return
    #[serde(default = "default_max_items")]
    #[schemars(range(min = 1, max = 1000))]
    pub max_items: i64,
}

impl ValidateInput for ListPoliciesInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_range("maxItems", self.max_items, MIN_MAX_ITEMS, MAX_MAX_ITEMS)
    }
}

#[derive(Serialize)]
struct ListPoliciesOutput {
    scope: PolicyScope,
    policies: Vec<PolicyInfo>,
    count: usize,
}

/// Tool for listing IAM managed policies
pub struct ListPoliciesTool;

impl Tool for ListPoliciesTool {
    type Input = ListPoliciesInput;

    fn name(&self) -> &str {
        "list_iam_policies"
    }

    fn description(&self) -> &str {
        "List IAM policies in the AWS account"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(scope = %input.scope, max_items = input.max_items, "Tool: list_iam_policies");
        let max_items = narrow("maxItems", input.max_items, MIN_MAX_ITEMS, MAX_MAX_ITEMS)?;
        let adapters = session.adapters();
        let policies = adapters
            .identity()
            .list_policies(input.scope, max_items)
            .await?;
        let count = policies.len();
        Ok(ToolResult::json(ListPoliciesOutput {
            scope: input.scope,
            policies,
            count,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_with;
    use aws_readonly_core::parse_input;
    use aws_readonly_core::test_utils::{MockIdentity, MockStorage};
    use serde_json::json;

    #[test]
    fn test_scope_defaults_to_local() {
        let input: ListPoliciesInput = parse_input(json!({})).unwrap();
        assert_eq!(input.scope, PolicyScope::Local);
        assert_eq!(input.max_items, 100);
    }

    #[test]
    fn test_scope_outside_enumeration_rejected() {
        let err = parse_input::<ListPoliciesInput>(json!({"scope": "Global"})).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_list_policies_passes_scope() {
        let identity = MockIdentity::new().with_policy_named("ReadOnlyAccess");
        let session = session_with(MockStorage::new(), identity.clone());

        let input = parse_input(json!({"scope": "AWS", "maxItems": 10})).unwrap();
        let result = ListPoliciesTool.execute(input, &session).await.unwrap();
        let json = result.as_json();

        assert_eq!(json["scope"], "AWS");
        assert_eq!(json["count"], 1);
        assert_eq!(json["policies"][0]["policyName"], "ReadOnlyAccess");
        assert_eq!(identity.calls()[0].args, json!({"scope": "AWS", "maxItems": 10}));
    }
}
