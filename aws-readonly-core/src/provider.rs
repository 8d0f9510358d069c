//! Collaborator contracts for the cloud-provider adapters.
//!
//! Three capability groups sit behind traits: object storage, the identity
//! directory, and credential issuance. Concrete SDK-backed implementations live
//! in `aws-readonly-tools`; mocks live in [`crate::test_utils`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

/// Failures reported by an adapter call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The named resource does not exist (user, role, policy, object).
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    /// AssumeRole returned successfully but carried no credentials.
    #[error("No credentials returned from AssumeRole")]
    NoCredentialsReturned,

    /// The remote call itself failed (access denied, throttling, network).
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }
}

/// An explicit temporary credential triple.
///
/// `Debug` redacts the secret key and session token.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl CredentialSet {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
        }
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

/// Credentials issued by a role assumption, with their expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumedCredentials {
    pub credentials: CredentialSet,
    pub expiration: DateTime<Utc>,
}

/// Scope filter for policy listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PolicyScope {
    /// Both AWS-managed and customer-managed policies
    All,
    /// AWS-managed policies only
    #[serde(rename = "AWS")]
    Aws,
    /// Customer-managed policies in this account
    #[default]
    Local,
}

impl PolicyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Aws => "AWS",
            Self::Local => "Local",
        }
    }
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a timestamp as RFC 3339 UTC with millisecond precision, e.g.
/// `2024-01-01T00:00:00.000Z`. Every timestamp in a tool payload uses this form.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ts {
        Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    pub name: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_name: String,
    pub user_id: String,
    pub arn: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub password_last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    pub role_name: String,
    pub role_id: String,
    pub arn: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInfo {
    pub policy_name: String,
    pub policy_id: String,
    pub arn: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Identity behind the issuance adapter's credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    pub user_id: String,
    pub account: String,
    pub arn: String,
}

/// Placeholder for identity fields missing from a response.
pub const UNKNOWN: &str = "unknown";

impl CallerIdentity {
    /// Build from optional response fields; each missing one becomes `"unknown"`.
    pub fn from_parts(user_id: Option<&str>, account: Option<&str>, arn: Option<&str>) -> Self {
        let or_unknown = |v: Option<&str>| v.unwrap_or(UNKNOWN).to_string();
        Self {
            user_id: or_unknown(user_id),
            account: or_unknown(account),
            arn: or_unknown(arn),
        }
    }
}

/// Object-storage queries.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>, ProviderError>;

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        max_keys: i32,
    ) -> Result<Vec<ObjectInfo>, ProviderError>;

    /// Read an object body as text.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<String, ProviderError>;

    /// Read a bucket policy. A bucket without a policy is `Ok(None)`, not an error.
    async fn get_bucket_policy(&self, bucket: &str) -> Result<Option<String>, ProviderError>;
}

/// Identity and policy queries.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn list_users(&self, max_items: i32) -> Result<Vec<UserInfo>, ProviderError>;

    async fn get_user(&self, user_name: &str) -> Result<UserInfo, ProviderError>;

    async fn list_roles(&self, max_items: i32) -> Result<Vec<RoleInfo>, ProviderError>;

    async fn get_role(&self, role_name: &str) -> Result<RoleInfo, ProviderError>;

    async fn list_policies(
        &self,
        scope: PolicyScope,
        max_items: i32,
    ) -> Result<Vec<PolicyInfo>, ProviderError>;

    async fn get_policy(&self, policy_arn: &str) -> Result<PolicyInfo, ProviderError>;
}

/// Temporary-credential issuance. Always runs on the ambient credential chain.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        duration_seconds: i32,
    ) -> Result<AssumedCredentials, ProviderError>;
}

/// Resolves the principal behind the credentials a lookup was built with.
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    async fn caller_identity(&self) -> Result<CallerIdentity, ProviderError>;
}

/// Builds the per-credential adapters for a credential set.
///
/// `None` means the ambient credential chain. Implementations carry the region.
pub trait AdapterFactory: Send + Sync {
    fn storage(&self, credentials: Option<&CredentialSet>) -> Arc<dyn ObjectStorage>;

    fn identity(&self, credentials: Option<&CredentialSet>) -> Arc<dyn IdentityDirectory>;

    fn principal(&self, credentials: Option<&CredentialSet>) -> Arc<dyn PrincipalLookup>;
}

/// One generation of the adapters consulted by tool handlers.
///
/// Immutable once built. Handlers hold an `Arc<AdapterSet>` for the duration
/// of a call, so a credential change mid-call cannot tear their view.
pub struct AdapterSet {
    storage: Arc<dyn ObjectStorage>,
    identity: Arc<dyn IdentityDirectory>,
    principal: Arc<dyn PrincipalLookup>,
    generation: u64,
}

impl AdapterSet {
    pub(crate) fn build(
        factory: &dyn AdapterFactory,
        credentials: Option<&CredentialSet>,
        generation: u64,
    ) -> Self {
        Self {
            storage: factory.storage(credentials),
            identity: factory.identity(credentials),
            principal: factory.principal(credentials),
            generation,
        }
    }

    pub fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }

    pub fn identity(&self) -> &dyn IdentityDirectory {
        self.identity.as_ref()
    }

    pub fn principal(&self) -> &dyn PrincipalLookup {
        self.principal.as_ref()
    }

    /// Starts at 0 for the ambient set and increases by one per rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for AdapterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterSet")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
