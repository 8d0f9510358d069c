use crate::prelude::*;
use serde_json::Value;

/// Input for reading a bucket policy
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetBucketPolicyInput {
    /// The name of the S3 bucket
    #[schemars(length(min = 1))]
    pub bucket: String,
}

impl ValidateInput for GetBucketPolicyInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("bucket", &self.bucket)
    }
}

/// Parse a policy document. No policy, or an empty one, is `null`.
fn parse_policy(policy: Option<&str>) -> Result<Value, serde_json::Error> {
    match policy.map(str::trim) {
        Some(text) if !text.is_empty() => serde_json::from_str(text),
        _ => Ok(Value::Null),
    }
}

/// Tool for reading a bucket's policy document
pub struct GetBucketPolicyTool;

impl Tool for GetBucketPolicyTool {
    type Input = GetBucketPolicyInput;

    fn name(&self) -> &str {
        "get_s3_bucket_policy"
    }

    fn description(&self) -> &str {
        "Get the policy of an S3 bucket"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(bucket = %input.bucket, "Tool: get_s3_bucket_policy");
        let adapters = session.adapters();
        let policy = adapters.storage().get_bucket_policy(&input.bucket).await?;

        Ok(ToolResult::new(serde_json::json!({
            "bucket": input.bucket,
            "policy": parse_policy(policy.as_deref())?,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_with;
    use aws_readonly_core::test_utils::{MockIdentity, MockStorage};
    use serde_json::json;

    fn input(bucket: &str) -> GetBucketPolicyInput {
        GetBucketPolicyInput {
            bucket: bucket.to_string(),
        }
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy(None).unwrap(), Value::Null);
        assert_eq!(parse_policy(Some("")).unwrap(), Value::Null);
        assert_eq!(parse_policy(Some("  \n")).unwrap(), Value::Null);
        assert_eq!(
            parse_policy(Some(r#"{"Version":"2012-10-17"}"#)).unwrap(),
            json!({"Version": "2012-10-17"})
        );
        assert!(parse_policy(Some("not json")).is_err());
    }

    #[tokio::test]
    async fn test_policy_document_is_parsed() {
        let document = json!({
            "Version": "2012-10-17",
            "Statement": [{"Effect": "Allow", "Principal": "*", "Action": "s3:GetObject"}]
        });
        let storage = MockStorage::new().with_policy("site", document.to_string());
        let session = session_with(storage, MockIdentity::new());

        let result = GetBucketPolicyTool.execute(input("site"), &session).await.unwrap();

        assert_eq!(result.as_json()["policy"], document);
    }

    #[tokio::test]
    async fn test_bucket_without_policy_yields_null() {
        let session = session_with(MockStorage::new(), MockIdentity::new());

        let result = GetBucketPolicyTool.execute(input("bare"), &session).await.unwrap();

        assert_eq!(
            result.as_json(),
            &json!({"bucket": "bare", "policy": null})
        );
    }
}
