use crate::prelude::*;
use aws_readonly_core::schema::{default_max_items, MAX_MAX_ITEMS, MIN_MAX_ITEMS};
use aws_readonly_core::ObjectInfo;

/// Input for listing objects in a bucket
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsInput {
    /// The name of the S3 bucket
    #[schemars(length(min = 1))]
    pub bucket: String,

    /// Optional prefix to filter objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Maximum number of keys to return
    #[serde(default = "default_max_items")]
    #[schemars(range(min = 1, max = 1000))]
    pub max_keys: i64,
}

impl ValidateInput for ListObjectsInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("bucket", &self.bucket)?;
        require_range("maxKeys", self.max_keys, MIN_MAX_ITEMS, MAX_MAX_ITEMS)
    }
}

#[derive(Serialize)]
struct ListObjectsOutput {
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    objects: Vec<ObjectInfo>,
    count: usize,
}

/// Tool for listing the objects in a bucket
pub struct ListObjectsTool;

impl Tool for ListObjectsTool {
    type Input = ListObjectsInput;

    fn name(&self) -> &str {
        "list_s3_objects"
    }

    fn description(&self) -> &str {
        "List objects in an S3 bucket"
    }

    async fn execute(
        &self,
        input: Self::Input,
        session: &SessionManager,
    ) -> Result<ToolResult, ToolError> {
        tracing::info!(bucket = %input.bucket, "Tool: list_s3_objects");
        let max_keys = narrow("maxKeys", input.max_keys, MIN_MAX_ITEMS, MAX_MAX_ITEMS)?;
        let adapters = session.adapters();
        let objects = adapters
            .storage()
            .list_objects(&input.bucket, input.prefix.as_deref(), max_keys)
            .await?;

        let count = objects.len();
        Ok(ToolResult::json(ListObjectsOutput {
            bucket: input.bucket,
            prefix: input.prefix,
            objects,
            count,
        })?)
    }
}
