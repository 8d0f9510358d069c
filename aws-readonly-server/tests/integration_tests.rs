//! Integration tests for aws-readonly-server.
//!
//! These drive the bootstrap and the protocol handler against mock adapters.

use std::sync::Arc;

use aws_readonly_core::test_utils::{MockAdapterFactory, MockIdentity, MockIssuer, MockStorage};
use aws_readonly_core::{CredentialSet, ProviderError, SessionState};
use aws_readonly_server::{bootstrap, AwsReadonlyServer, ServerConfig, ServerError};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde_json::{json, Value};

const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/reader";

fn config_with_role(role: Option<&str>) -> ServerConfig {
    ServerConfig {
        assume_role_arn: role.map(str::to_string),
        session_duration: 1800,
        ..ServerConfig::default()
    }
}

async fn start(
    config: &ServerConfig,
    factory: &MockAdapterFactory,
    issuer: &MockIssuer,
) -> Result<AwsReadonlyServer, ServerError> {
    let factory = factory.clone().with_issuer(issuer.clone());
    bootstrap(config, Arc::new(factory), Arc::new(issuer.clone())).await
}

async fn call(server: &AwsReadonlyServer, name: &str, arguments: Value) -> CallToolResult {
    server
        .handle_call(CallToolRequestParam {
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
        })
        .await
}

fn payload(result: &CallToolResult) -> Value {
    let text = result.content[0].as_text().expect("text content");
    serde_json::from_str(&text.text).expect("JSON payload")
}

#[tokio::test]
async fn test_starts_on_ambient_credentials() {
    let factory = MockAdapterFactory::new();
    let issuer = MockIssuer::new();

    let server = start(&config_with_role(None), &factory, &issuer).await.unwrap();

    assert!(issuer.assume_calls().is_empty());
    assert_eq!(server.dispatcher().session().state(), SessionState::Unassumed);
    assert_eq!(server.tools().len(), 12);
}

#[tokio::test]
async fn test_startup_role_is_assumed_before_serving() {
    let storage = MockStorage::new().with_bucket("audit");
    let factory = MockAdapterFactory::new()
        .with_storage(storage.clone())
        .with_identity(MockIdentity::new());
    let issuer = MockIssuer::new();

    let server = start(&config_with_role(Some(ROLE_ARN)), &factory, &issuer)
        .await
        .unwrap();

    let calls = issuer.assume_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].role_arn, ROLE_ARN);
    assert_eq!(calls[0].duration_seconds, 1800);
    assert!(server.dispatcher().session().state().is_assumed());

    let result = call(&server, "list_s3_buckets", json!({})).await;
    assert_eq!(result.is_error, Some(false));
    assert_eq!(
        storage.calls()[0].credentials,
        Some(CredentialSet::new("ASIAMOCK", "mock-secret", "mock-token"))
    );
}

#[tokio::test]
async fn test_failed_startup_role_is_fatal() {
    let factory = MockAdapterFactory::new();
    let issuer = MockIssuer::new();
    issuer.fail_with(ProviderError::service("AssumeRole", "Access denied"));

    let err = start(&config_with_role(Some(ROLE_ARN)), &factory, &issuer)
        .await
        .err()
        .expect("startup must fail");

    assert!(matches!(err, ServerError::StartupRole { ref role_arn, .. } if role_arn == ROLE_ARN));
    assert_eq!(
        err.to_string(),
        format!("Failed to assume startup role {ROLE_ARN}: AssumeRole failed: Access denied")
    );
}

#[tokio::test]
async fn test_validation_failure_is_error_result() {
    let storage = MockStorage::new();
    let factory = MockAdapterFactory::new().with_storage(storage.clone());
    let server = start(&config_with_role(None), &factory, &MockIssuer::new())
        .await
        .unwrap();

    let result = call(&server, "list_s3_objects", json!({"bucket": "b", "maxKeys": 0})).await;

    assert_eq!(result.is_error, Some(true));
    assert!(payload(&result)["error"].as_str().unwrap().contains("maxKeys"));
    assert_eq!(storage.call_count(), 0);
}

#[tokio::test]
async fn test_role_switch_through_protocol() {
    let identity = MockIdentity::new().with_user_named("alice");
    let factory = MockAdapterFactory::new().with_identity(identity.clone());
    let issuer = MockIssuer::new();
    let server = start(&config_with_role(None), &factory, &issuer).await.unwrap();

    issuer.set_credentials(
        CredentialSet::new("ASIANEW", "new-secret", "new-token"),
        chrono::Utc::now() + chrono::Duration::hours(2),
    );
    let assumed = call(
        &server,
        "assume_iam_role",
        json!({"roleArn": ROLE_ARN, "sessionDuration": 7200}),
    )
    .await;
    assert_eq!(assumed.is_error, Some(false));
    assert_eq!(payload(&assumed)["credentials"]["accessKeyId"], "ASIANEW");

    let users = call(&server, "list_iam_users", json!({})).await;
    assert_eq!(users.is_error, Some(false));
    assert_eq!(payload(&users)["users"][0]["userName"], "alice");

    let last = identity.calls().pop().unwrap();
    assert_eq!(last.credentials.unwrap().access_key_id, "ASIANEW");
}
