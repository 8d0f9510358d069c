use async_trait::async_trait;
use aws_readonly_core::{BucketInfo, ObjectInfo, ObjectStorage, ProviderError};
use aws_sdk_s3::Client;

use super::{error_code, service_error, to_utc};

/// S3 error code for a bucket that has no policy attached.
const NO_SUCH_BUCKET_POLICY: &str = "NoSuchBucketPolicy";

/// [`ObjectStorage`] over an S3 client.
#[derive(Clone, Debug)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>, ProviderError> {
        tracing::debug!("Listing S3 buckets");
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| service_error("ListBuckets", e))?;

        Ok(output
            .buckets()
            .iter()
            .map(|b| BucketInfo {
                name: b.name().unwrap_or_default().to_string(),
                creation_date: b.creation_date().and_then(to_utc),
            })
            .collect())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        max_keys: i32,
    ) -> Result<Vec<ObjectInfo>, ProviderError> {
        tracing::debug!(bucket, prefix, max_keys, "Listing S3 objects");
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_string))
            .max_keys(max_keys)
            .send()
            .await
            .map_err(|e| service_error("ListObjectsV2", e))?;

        Ok(output
            .contents()
            .iter()
            .map(|o| ObjectInfo {
                key: o.key().unwrap_or_default().to_string(),
                size: o.size(),
                last_modified: o.last_modified().and_then(to_utc),
                e_tag: o.e_tag().map(str::to_string),
            })
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<String, ProviderError> {
        tracing::debug!(bucket, key, "Getting S3 object");
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|s| s.is_no_such_key()) => {
                return Err(ProviderError::not_found("Object", format!("{}/{}", bucket, key)));
            }
            Err(e) => return Err(service_error("GetObject", e)),
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ProviderError::service("GetObject", e.to_string()))?
            .into_bytes();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<Option<String>, ProviderError> {
        tracing::debug!(bucket, "Getting S3 bucket policy");
        match self.client.get_bucket_policy().bucket(bucket).send().await {
            Ok(output) => Ok(output.policy().map(str::to_string)),
            Err(e) if error_code(&e) == Some(NO_SUCH_BUCKET_POLICY) => {
                tracing::debug!(bucket, "Bucket has no policy");
                Ok(None)
            }
            Err(e) => Err(service_error("GetBucketPolicy", e)),
        }
    }
}
