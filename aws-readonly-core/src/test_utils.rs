//! Test utilities for aws-readonly-core.
//!
//! Mock adapters that answer from in-memory fixtures and record every call,
//! including the credentials the adapter was built with. Use them to drive
//! tools and the dispatcher without AWS access.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! aws-readonly-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use aws_readonly_core::SessionManager;
//! use aws_readonly_core::test_utils::{MockAdapterFactory, MockIdentity, MockIssuer};
//!
//! let identity = MockIdentity::new().with_user_named("user1");
//! let factory = MockAdapterFactory::new().with_identity(identity.clone());
//! let session = SessionManager::new(Arc::new(factory), Arc::new(MockIssuer::new()));
//! assert_eq!(session.adapters().generation(), 0);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::provider::{
    AdapterFactory, AssumedCredentials, BucketInfo, CallerIdentity, CredentialIssuer,
    CredentialSet, IdentityDirectory, ObjectInfo, ObjectStorage, PolicyInfo, PolicyScope,
    PrincipalLookup, ProviderError, RoleInfo, UserInfo,
};

/// One adapter call as seen by a mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub args: Value,
    /// Credentials the adapter instance was built with (`None` = ambient).
    pub credentials: Option<CredentialSet>,
}

fn fixed_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

// ============================================================================
// Object storage
// ============================================================================

#[derive(Default)]
struct StorageFixtures {
    buckets: Vec<BucketInfo>,
    objects: Vec<(String, ObjectInfo, String)>,
    policies: HashMap<String, String>,
    failure: Option<ProviderError>,
    calls: Vec<RecordedCall>,
}

/// In-memory object storage.
///
/// Clones share fixtures and the call log.
#[derive(Clone, Default)]
pub struct MockStorage {
    fixtures: Arc<Mutex<StorageFixtures>>,
    credentials: Option<CredentialSet>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, name: impl Into<String>) -> Self {
        self.fixtures.lock().unwrap().buckets.push(BucketInfo {
            name: name.into(),
            creation_date: Some(fixed_date()),
        });
        self
    }

    pub fn with_object(
        self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let info = ObjectInfo {
            key: key.into(),
            size: Some(content.len() as i64),
            last_modified: Some(fixed_date()),
            e_tag: Some("\"mock-etag\"".to_string()),
        };
        self.fixtures
            .lock()
            .unwrap()
            .objects
            .push((bucket.into(), info, content));
        self
    }

    pub fn with_policy(self, bucket: impl Into<String>, policy: impl Into<String>) -> Self {
        self.fixtures
            .lock()
            .unwrap()
            .policies
            .insert(bucket.into(), policy.into());
        self
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: ProviderError) {
        self.fixtures.lock().unwrap().failure = Some(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.fixtures.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.fixtures.lock().unwrap().calls.len()
    }

    fn bound_to(&self, credentials: Option<CredentialSet>) -> Self {
        Self {
            fixtures: self.fixtures.clone(),
            credentials,
        }
    }

    fn record(&self, operation: &'static str, args: Value) -> Result<(), ProviderError> {
        let mut fixtures = self.fixtures.lock().unwrap();
        fixtures.calls.push(RecordedCall {
            operation,
            args,
            credentials: self.credentials.clone(),
        });
        match &fixtures.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>, ProviderError> {
        self.record("list_buckets", json!({}))?;
        Ok(self.fixtures.lock().unwrap().buckets.clone())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        max_keys: i32,
    ) -> Result<Vec<ObjectInfo>, ProviderError> {
        self.record(
            "list_objects",
            json!({"bucket": bucket, "prefix": prefix, "maxKeys": max_keys}),
        )?;
        let fixtures = self.fixtures.lock().unwrap();
        Ok(fixtures
            .objects
            .iter()
            .filter(|(b, info, _)| b == bucket && info.key.starts_with(prefix.unwrap_or("")))
            .take(usize::try_from(max_keys).unwrap_or(0))
            .map(|(_, info, _)| info.clone())
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<String, ProviderError> {
        self.record("get_object", json!({"bucket": bucket, "key": key}))?;
        let fixtures = self.fixtures.lock().unwrap();
        fixtures
            .objects
            .iter()
            .find(|(b, info, _)| b == bucket && info.key == key)
            .map(|(_, _, content)| content.clone())
            .ok_or_else(|| ProviderError::not_found("Object", format!("{}/{}", bucket, key)))
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<Option<String>, ProviderError> {
        self.record("get_bucket_policy", json!({"bucket": bucket}))?;
        Ok(self.fixtures.lock().unwrap().policies.get(bucket).cloned())
    }
}

// ============================================================================
// Identity directory
// ============================================================================

#[derive(Default)]
struct IdentityFixtures {
    users: Vec<UserInfo>,
    roles: Vec<RoleInfo>,
    policies: Vec<PolicyInfo>,
    failure: Option<ProviderError>,
    calls: Vec<RecordedCall>,
}

/// In-memory identity directory.
///
/// Clones share fixtures and the call log.
#[derive(Clone, Default)]
pub struct MockIdentity {
    fixtures: Arc<Mutex<IdentityFixtures>>,
    credentials: Option<CredentialSet>,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: UserInfo) -> Self {
        self.fixtures.lock().unwrap().users.push(user);
        self
    }

    /// Add a user with generated id and ARN.
    pub fn with_user_named(self, name: &str) -> Self {
        self.with_user(UserInfo {
            user_name: name.to_string(),
            user_id: format!("AIDA{}", name.to_uppercase()),
            arn: format!("arn:aws:iam::123456789012:user/{}", name),
            create_date: Some(fixed_date()),
            password_last_used: None,
        })
    }

    pub fn with_role_named(self, name: &str) -> Self {
        self.fixtures.lock().unwrap().roles.push(RoleInfo {
            role_name: name.to_string(),
            role_id: format!("AROA{}", name.to_uppercase()),
            arn: format!("arn:aws:iam::123456789012:role/{}", name),
            create_date: Some(fixed_date()),
            description: None,
        });
        self
    }

    pub fn with_policy_named(self, name: &str) -> Self {
        self.fixtures.lock().unwrap().policies.push(PolicyInfo {
            policy_name: name.to_string(),
            policy_id: format!("ANPA{}", name.to_uppercase()),
            arn: format!("arn:aws:iam::123456789012:policy/{}", name),
            create_date: Some(fixed_date()),
            description: None,
        });
        self
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: ProviderError) {
        self.fixtures.lock().unwrap().failure = Some(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.fixtures.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.fixtures.lock().unwrap().calls.len()
    }

    fn bound_to(&self, credentials: Option<CredentialSet>) -> Self {
        Self {
            fixtures: self.fixtures.clone(),
            credentials,
        }
    }

    fn record(&self, operation: &'static str, args: Value) -> Result<(), ProviderError> {
        let mut fixtures = self.fixtures.lock().unwrap();
        fixtures.calls.push(RecordedCall {
            operation,
            args,
            credentials: self.credentials.clone(),
        });
        match &fixtures.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn limit<T: Clone>(items: &[T], max_items: i32) -> Vec<T> {
    items
        .iter()
        .take(usize::try_from(max_items).unwrap_or(0))
        .cloned()
        .collect()
}

#[async_trait]
impl IdentityDirectory for MockIdentity {
    async fn list_users(&self, max_items: i32) -> Result<Vec<UserInfo>, ProviderError> {
        self.record("list_users", json!({"maxItems": max_items}))?;
        Ok(limit(&self.fixtures.lock().unwrap().users, max_items))
    }

    async fn get_user(&self, user_name: &str) -> Result<UserInfo, ProviderError> {
        self.record("get_user", json!({"userName": user_name}))?;
        let fixtures = self.fixtures.lock().unwrap();
        fixtures
            .users
            .iter()
            .find(|u| u.user_name == user_name)
            .cloned()
            .ok_or_else(|| ProviderError::not_found("User", user_name))
    }

    async fn list_roles(&self, max_items: i32) -> Result<Vec<RoleInfo>, ProviderError> {
        self.record("list_roles", json!({"maxItems": max_items}))?;
        Ok(limit(&self.fixtures.lock().unwrap().roles, max_items))
    }

    async fn get_role(&self, role_name: &str) -> Result<RoleInfo, ProviderError> {
        self.record("get_role", json!({"roleName": role_name}))?;
        let fixtures = self.fixtures.lock().unwrap();
        fixtures
            .roles
            .iter()
            .find(|r| r.role_name == role_name)
            .cloned()
            .ok_or_else(|| ProviderError::not_found("Role", role_name))
    }

    async fn list_policies(
        &self,
        scope: PolicyScope,
        max_items: i32,
    ) -> Result<Vec<PolicyInfo>, ProviderError> {
        self.record(
            "list_policies",
            json!({"scope": scope.as_str(), "maxItems": max_items}),
        )?;
        Ok(limit(&self.fixtures.lock().unwrap().policies, max_items))
    }

    async fn get_policy(&self, policy_arn: &str) -> Result<PolicyInfo, ProviderError> {
        self.record("get_policy", json!({"policyArn": policy_arn}))?;
        let fixtures = self.fixtures.lock().unwrap();
        fixtures
            .policies
            .iter()
            .find(|p| p.arn == policy_arn)
            .cloned()
            .ok_or_else(|| ProviderError::not_found("Policy", policy_arn))
    }
}

// ============================================================================
// Credential issuance
// ============================================================================

/// Arguments of one `assume_role` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleCall {
    pub role_arn: String,
    pub session_name: String,
    pub duration_seconds: i32,
}

struct IssuerState {
    outcome: Result<AssumedCredentials, ProviderError>,
    identity: CallerIdentity,
    identities_by_key: HashMap<String, CallerIdentity>,
    calls: Vec<AssumeRoleCall>,
}

/// Credential issuer returning a configurable outcome.
///
/// By default it issues `ASIAMOCK` credentials valid for one hour. As a
/// [`PrincipalLookup`] it reports the identity registered for the access key
/// it was built with, or the default identity.
#[derive(Clone)]
pub struct MockIssuer {
    state: Arc<Mutex<IssuerState>>,
    credentials: Option<CredentialSet>,
}

impl MockIssuer {
    pub fn new() -> Self {
        let outcome = Ok(AssumedCredentials {
            credentials: CredentialSet::new("ASIAMOCK", "mock-secret", "mock-token"),
            expiration: Utc::now() + Duration::hours(1),
        });
        Self {
            state: Arc::new(Mutex::new(IssuerState {
                outcome,
                identity: CallerIdentity::from_parts(
                    Some("AIDAMOCK"),
                    Some("123456789012"),
                    Some("arn:aws:iam::123456789012:user/mock"),
                ),
                identities_by_key: HashMap::new(),
                calls: Vec::new(),
            })),
            credentials: None,
        }
    }

    pub fn with_credentials(self, credentials: CredentialSet, expiration: DateTime<Utc>) -> Self {
        self.set_credentials(credentials, expiration);
        self
    }

    pub fn with_identity(self, identity: CallerIdentity) -> Self {
        self.state.lock().unwrap().identity = identity;
        self
    }

    /// Report `identity` for lookups built with `access_key_id`.
    pub fn with_identity_for(self, access_key_id: &str, identity: CallerIdentity) -> Self {
        self.state
            .lock()
            .unwrap()
            .identities_by_key
            .insert(access_key_id.to_string(), identity);
        self
    }

    fn bound_to(&self, credentials: Option<CredentialSet>) -> Self {
        Self {
            state: self.state.clone(),
            credentials,
        }
    }

    /// Issue `credentials` on subsequent calls, clearing any configured failure.
    pub fn set_credentials(&self, credentials: CredentialSet, expiration: DateTime<Utc>) {
        self.state.lock().unwrap().outcome = Ok(AssumedCredentials {
            credentials,
            expiration,
        });
    }

    /// Fail subsequent `assume_role` calls with `error`.
    pub fn fail_with(&self, error: ProviderError) {
        self.state.lock().unwrap().outcome = Err(error);
    }

    pub fn assume_calls(&self) -> Vec<AssumeRoleCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl Default for MockIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialIssuer for MockIssuer {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        duration_seconds: i32,
    ) -> Result<AssumedCredentials, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(AssumeRoleCall {
            role_arn: role_arn.to_string(),
            session_name: session_name.to_string(),
            duration_seconds,
        });
        state.outcome.clone()
    }
}

#[async_trait]
impl PrincipalLookup for MockIssuer {
    async fn caller_identity(&self) -> Result<CallerIdentity, ProviderError> {
        let state = self.state.lock().unwrap();
        let identity = self
            .credentials
            .as_ref()
            .and_then(|c| state.identities_by_key.get(&c.access_key_id))
            .unwrap_or(&state.identity);
        Ok(identity.clone())
    }
}

// ============================================================================
// Adapter factory
// ============================================================================

/// Factory handing out views of shared mock adapters.
///
/// Every built adapter records the credentials it was built with, and the
/// factory keeps the sequence of credentials it was asked to build for.
#[derive(Clone, Default)]
pub struct MockAdapterFactory {
    storage: MockStorage,
    identity: MockIdentity,
    issuer: MockIssuer,
    built_with: Arc<Mutex<Vec<Option<CredentialSet>>>>,
}

impl MockAdapterFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(mut self, storage: MockStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_identity(mut self, identity: MockIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Answer principal lookups from `issuer`.
    pub fn with_issuer(mut self, issuer: MockIssuer) -> Self {
        self.issuer = issuer;
        self
    }

    /// Credentials passed to each `storage`/`identity` build, in order.
    pub fn built_with(&self) -> Vec<Option<CredentialSet>> {
        self.built_with.lock().unwrap().clone()
    }
}

impl AdapterFactory for MockAdapterFactory {
    fn storage(&self, credentials: Option<&CredentialSet>) -> Arc<dyn ObjectStorage> {
        self.built_with.lock().unwrap().push(credentials.cloned());
        Arc::new(self.storage.bound_to(credentials.cloned()))
    }

    fn identity(&self, credentials: Option<&CredentialSet>) -> Arc<dyn IdentityDirectory> {
        self.built_with.lock().unwrap().push(credentials.cloned());
        Arc::new(self.identity.bound_to(credentials.cloned()))
    }

    fn principal(&self, credentials: Option<&CredentialSet>) -> Arc<dyn PrincipalLookup> {
        Arc::new(self.issuer.bound_to(credentials.cloned()))
    }
}
