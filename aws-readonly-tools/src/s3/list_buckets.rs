use crate::prelude::*;
use aws_readonly_core::BucketInfo;

/// Input for listing buckets. Takes no arguments.
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ListBucketsInput {}

impl ValidateInput for ListBucketsInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[derive(Serialize)]
struct ListBucketsOutput {
    buckets: Vec<BucketInfo>,
    count: usize,
}

/// Tool for listing every S3 bucket visible to the active credentials
pub struct ListBucketsTool;

impl Tool for ListBucketsTool {
    type Input = ListBucketsInput;

    fn name(&self) -> &str {
        "list_s3_buckets"
    }

    fn description(&self) -> &str {
        "List all S3 buckets in the AWS account"
    }

    async fn execute(
        &self,
        _input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!("Tool: list_s3_buckets");
        let adapters = session.adapters();
        let buckets = adapters.storage().list_buckets().await?;
        let count = buckets.len();
        Ok(ToolResult::json(ListBucketsOutput { buckets, count })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_with;
    use aws_readonly_core::test_utils::{MockIdentity, MockStorage};

    #[tokio::test]
    async fn test_list_buckets() {
        let storage = MockStorage::new().with_bucket("alpha").with_bucket("beta");
        let session = session_with(storage, MockIdentity::new());

        let result = ListBucketsTool
            .execute(ListBucketsInput::default(), &session)
            .await
            .unwrap();
        let json = result.as_json();

        assert_eq!(json["count"], 2);
        assert_eq!(json["buckets"][0]["name"], "alpha");
        assert_eq!(json["buckets"][1]["creationDate"], "2024-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_list_buckets_empty() {
        let session = session_with(MockStorage::new(), MockIdentity::new());
        let result = ListBucketsTool
            .execute(ListBucketsInput::default(), &session)
            .await
            .unwrap();
        assert_eq!(
            result.as_json(),
            &serde_json::json!({"buckets": [], "count": 0})
        );
    }
}
