use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_readonly_core::{
    AssumedCredentials, CallerIdentity, CredentialIssuer, CredentialSet, PrincipalLookup,
    ProviderError,
};
use aws_sdk_sts::Client;

use super::{service_error, to_utc};

/// STS client adapter.
///
/// As a [`CredentialIssuer`] it is built on the ambient credential chain. As a
/// [`PrincipalLookup`] it is built for whichever credentials are current.
#[derive(Clone, Debug)]
pub struct StsIssuer {
    client: Client,
}

impl StsIssuer {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialIssuer for StsIssuer {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        duration_seconds: i32,
    ) -> Result<AssumedCredentials, ProviderError> {
        tracing::debug!(role_arn, session_name, duration_seconds, "Calling AssumeRole");
        let output = self
            .client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .duration_seconds(duration_seconds)
            .send()
            .await
            .map_err(|e| service_error("AssumeRole", e))?;

        let credentials = output
            .credentials()
            .ok_or(ProviderError::NoCredentialsReturned)?;
        let expiration =
            to_utc(credentials.expiration()).ok_or(ProviderError::NoCredentialsReturned)?;

        Ok(AssumedCredentials {
            credentials: CredentialSet::new(
                credentials.access_key_id(),
                credentials.secret_access_key(),
                credentials.session_token(),
            ),
            expiration,
        })
    }
}

#[async_trait]
impl PrincipalLookup for StsIssuer {
    async fn caller_identity(&self) -> Result<CallerIdentity, ProviderError> {
        tracing::debug!("Calling GetCallerIdentity");
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| service_error("GetCallerIdentity", e))?;

        Ok(CallerIdentity::from_parts(
            output.user_id(),
            output.account(),
            output.arn(),
        ))
    }
}
