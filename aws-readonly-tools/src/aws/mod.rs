//! AWS SDK backed adapters.
//!
//! [`AwsAdapterFactory`] builds S3, IAM and identity-lookup STS clients for a
//! region, either on the ambient credential chain or on an explicit credential
//! set. Role assumption always goes through an [`StsIssuer`] on the ambient
//! chain.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use aws_readonly_core::SessionManager;
//! use aws_readonly_tools::aws::{load_sdk_config, AwsAdapterFactory, StsIssuer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk_config = load_sdk_config("us-east-1").await;
//!     let session = SessionManager::new(
//!         Arc::new(AwsAdapterFactory::new(sdk_config.clone())),
//!         Arc::new(StsIssuer::new(&sdk_config)),
//!     );
//!     assert!(!session.state().is_assumed());
//! }
//! ```

mod iam;
mod s3;
mod sts;

pub use iam::IamDirectory;
pub use s3::S3Storage;
pub use sts::StsIssuer;

use std::error::Error as StdError;
use std::fmt::Debug;
use std::sync::Arc;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_readonly_core::{
    AdapterFactory, CredentialSet, IdentityDirectory, ObjectStorage, PrincipalLookup,
    ProviderError,
};
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use chrono::{DateTime, Utc};

/// Provider name attached to credentials issued by a role assumption.
const ASSUMED_PROVIDER_NAME: &str = "aws-readonly-assumed-role";

/// Load shared SDK configuration for `region` from the default chain.
pub async fn load_sdk_config(region: impl Into<String>) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.into()))
        .load()
        .await
}

/// Builds SDK-backed storage and identity adapters.
#[derive(Clone)]
pub struct AwsAdapterFactory {
    sdk_config: SdkConfig,
}

impl AwsAdapterFactory {
    pub fn new(sdk_config: SdkConfig) -> Self {
        Self { sdk_config }
    }

    pub fn region(&self) -> Option<&str> {
        self.sdk_config.region().map(|r| r.as_ref())
    }
}

impl AdapterFactory for AwsAdapterFactory {
    fn storage(&self, credentials: Option<&CredentialSet>) -> Arc<dyn ObjectStorage> {
        let mut builder = aws_sdk_s3::config::Builder::from(&self.sdk_config);
        if let Some(credentials) = credentials {
            builder = builder.credentials_provider(sdk_credentials(credentials));
        }
        tracing::debug!(
            region = ?self.region(),
            explicit_credentials = credentials.is_some(),
            "Building S3 client"
        );
        Arc::new(S3Storage::new(aws_sdk_s3::Client::from_conf(builder.build())))
    }

    fn identity(&self, credentials: Option<&CredentialSet>) -> Arc<dyn IdentityDirectory> {
        let mut builder = aws_sdk_iam::config::Builder::from(&self.sdk_config);
        if let Some(credentials) = credentials {
            builder = builder.credentials_provider(sdk_credentials(credentials));
        }
        tracing::debug!(
            region = ?self.region(),
            explicit_credentials = credentials.is_some(),
            "Building IAM client"
        );
        Arc::new(IamDirectory::new(aws_sdk_iam::Client::from_conf(builder.build())))
    }

    fn principal(&self, credentials: Option<&CredentialSet>) -> Arc<dyn PrincipalLookup> {
        let mut builder = aws_sdk_sts::config::Builder::from(&self.sdk_config);
        if let Some(credentials) = credentials {
            builder = builder.credentials_provider(sdk_credentials(credentials));
        }
        Arc::new(StsIssuer::with_client(aws_sdk_sts::Client::from_conf(
            builder.build(),
        )))
    }
}

fn sdk_credentials(credentials: &CredentialSet) -> Credentials {
    Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        Some(credentials.session_token.clone()),
        None,
        ASSUMED_PROVIDER_NAME,
    )
}

/// Convert an SDK timestamp to a chrono UTC timestamp.
pub(crate) fn to_utc(dt: &aws_smithy_types::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

/// Error code reported by the service, if the failure got that far.
pub(crate) fn error_code<E, R>(err: &SdkError<E, R>) -> Option<&str>
where
    E: ProvideErrorMetadata,
{
    err.as_service_error().and_then(|e| e.code())
}

/// Map an SDK failure to a [`ProviderError::Service`] for `operation`.
///
/// Prefers the service's own code and message. Transport failures fall back
/// to the innermost message in the error chain.
pub(crate) fn service_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    let message = match err.as_service_error() {
        Some(service) => match (service.code(), service.message()) {
            (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
            (Some(code), None) => Some(code.to_string()),
            (None, Some(message)) => Some(message.to_string()),
            (None, None) => None,
        },
        None => None,
    };

    let message = message.unwrap_or_else(|| {
        let mut messages = Vec::new();
        collect_error_messages(&err, &mut messages);
        messages
            .pop()
            .unwrap_or_else(|| "Unknown error".to_string())
    });

    tracing::error!(operation, error = %message, "AWS call failed");
    ProviderError::service(operation, message)
}

fn collect_error_messages(err: &dyn StdError, messages: &mut Vec<String>) {
    let msg = err.to_string();
    // Generic SDK wrappers carry no detail
    if !msg.is_empty()
        && !msg.starts_with("dispatch failure")
        && !msg.starts_with("connector error")
        && !msg.starts_with("unhandled error")
        && !msg.starts_with("service error")
    {
        messages.push(msg);
    }

    if let Some(source) = err.source() {
        collect_error_messages(source, messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_utc_keeps_subsecond_precision() {
        let dt = aws_smithy_types::DateTime::from_secs_and_nanos(1_700_000_000, 500_000_000);
        let utc = to_utc(&dt).unwrap();
        assert_eq!(utc.timestamp(), 1_700_000_000);
        assert_eq!(utc.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_sdk_credentials_carry_session_token() {
        let creds = sdk_credentials(&CredentialSet::new("ASIA1", "secret", "token"));
        assert_eq!(creds.access_key_id(), "ASIA1");
        assert_eq!(creds.secret_access_key(), "secret");
        assert_eq!(creds.session_token(), Some("token"));
    }

    #[test]
    fn test_factory_reports_region() {
        let sdk_config = SdkConfig::builder()
            .region(Region::new("eu-west-1"))
            .behavior_version(BehaviorVersion::latest())
            .build();
        let factory = AwsAdapterFactory::new(sdk_config);
        assert_eq!(factory.region(), Some("eu-west-1"));
    }
}
