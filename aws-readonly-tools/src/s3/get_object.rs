use crate::prelude::*;

/// Input for reading an object
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetObjectInput {
    /// The name of the S3 bucket
    #[schemars(length(min = 1))]
    pub bucket: String,

    /// The key of the object
    #[schemars(length(min = 1))]
    pub key: String,
}

impl ValidateInput for GetObjectInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("bucket", &self.bucket)?;
        require_non_empty("key", &self.key)
    }
}

/// Tool for reading an object's content as text
pub struct GetObjectTool;

impl Tool for GetObjectTool {
    type Input = GetObjectInput;

    fn name(&self) -> &str {
        "get_s3_object"
    }

    fn description(&self) -> &str {
        "Get the content of an S3 object"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(bucket = %input.bucket, key = %input.key, "Tool: get_s3_object");
        let adapters = session.adapters();
        let content = adapters
            .storage()
            .get_object(&input.bucket, &input.key)
            .await?;

        Ok(ToolResult::new(serde_json::json!({
            "bucket": input.bucket,
            "key": input.key,
            "content": content,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_with;
    use aws_readonly_core::test_utils::{MockIdentity, MockStorage};
    use aws_readonly_core::ProviderError;

    fn input(bucket: &str, key: &str) -> GetObjectInput {
        GetObjectInput {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_object_returns_content() {
        let storage = MockStorage::new().with_object("docs", "readme.md", "# Hello");
        let session = session_with(storage, MockIdentity::new());

        let result = GetObjectTool
            .execute(input("docs", "readme.md"), &session)
            .await
            .unwrap();

        assert_eq!(
            result.as_json(),
            &serde_json::json!({"bucket": "docs", "key": "readme.md", "content": "# Hello"})
        );
    }

    #[tokio::test]
    async fn test_get_missing_object_is_not_found() {
        let session = session_with(MockStorage::new(), MockIdentity::new());

        let err = GetObjectTool
            .execute(input("docs", "missing"), &session)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ToolError::Provider(ProviderError::NotFound { kind: "Object", .. })
        ));
    }
}
