//! Credential session management.
//!
//! The [`SessionManager`] owns the one piece of mutable process state: which
//! credentials the storage and identity adapters use. The session starts on
//! the ambient credential chain and moves to an assumed role on each
//! successful role assumption. It never moves back.
//!
//! Session state and the adapter generation built for it are kept behind a
//! single lock and swapped together, so readers see either the old pair or
//! the new pair.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::provider::{
    format_timestamp, AdapterFactory, AdapterSet, AssumedCredentials, CallerIdentity,
    CredentialIssuer, CredentialSet, ProviderError,
};

/// Prefix for generated role session names.
pub const SESSION_NAME_PREFIX: &str = "aws-readonly";

/// The active credential state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Ambient credentials from the environment's default chain.
    #[default]
    Unassumed,
    /// Temporary credentials from a role assumption.
    ///
    /// Expiration is informational; it is not checked before adapter calls.
    Assumed {
        role_arn: String,
        credentials: CredentialSet,
        expiration: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn is_assumed(&self) -> bool {
        matches!(self, Self::Assumed { .. })
    }

    pub fn credentials(&self) -> Option<&CredentialSet> {
        match self {
            Self::Unassumed => None,
            Self::Assumed { credentials, .. } => Some(credentials),
        }
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Unassumed => None,
            Self::Assumed { expiration, .. } => Some(*expiration),
        }
    }
}

struct Current {
    state: SessionState,
    adapters: Arc<AdapterSet>,
}

/// Owns the session state and the adapters built for it.
///
/// Shared as `Arc<SessionManager>` between the dispatcher and whatever
/// bootstraps the process. Handlers call [`adapters`](Self::adapters) once at
/// entry and keep that snapshot for the rest of the call.
pub struct SessionManager {
    factory: Arc<dyn AdapterFactory>,
    issuer: Arc<dyn CredentialIssuer>,
    current: RwLock<Current>,
}

impl SessionManager {
    /// Start an `Unassumed` session with adapters on the ambient chain.
    pub fn new(factory: Arc<dyn AdapterFactory>, issuer: Arc<dyn CredentialIssuer>) -> Self {
        let adapters = Arc::new(AdapterSet::build(factory.as_ref(), None, 0));
        Self {
            factory,
            issuer,
            current: RwLock::new(Current {
                state: SessionState::Unassumed,
                adapters,
            }),
        }
    }

    /// Snapshot of the current adapter generation.
    pub fn adapters(&self) -> Arc<AdapterSet> {
        self.current.read().adapters.clone()
    }

    pub fn state(&self) -> SessionState {
        self.current.read().state.clone()
    }

    /// Assume `role_arn` and switch every subsequent adapter call to the
    /// returned credentials.
    ///
    /// Last writer wins: a later assumption fully replaces an earlier one.
    /// On failure the previous state and adapters are left untouched.
    pub async fn assume_role(
        &self,
        role_arn: &str,
        duration_seconds: i32,
    ) -> Result<AssumedCredentials, ProviderError> {
        let session_name = generate_session_name();
        tracing::info!(role_arn, session_name = %session_name, duration_seconds, "Assuming role");

        let assumed = self
            .issuer
            .assume_role(role_arn, &session_name, duration_seconds)
            .await
            .inspect_err(|e| tracing::error!(role_arn, error = %e, "Failed to assume role"))?;

        let state = SessionState::Assumed {
            role_arn: role_arn.to_string(),
            credentials: assumed.credentials.clone(),
            expiration: assumed.expiration,
        };
        self.rebuild_adapters(state, &assumed.credentials);

        tracing::info!(
            role_arn,
            expiration = %format_timestamp(&assumed.expiration),
            "Role assumed, adapters rebuilt"
        );
        Ok(assumed)
    }

    /// Principal behind the credentials currently in use.
    pub async fn caller_identity(&self) -> Result<CallerIdentity, ProviderError> {
        self.adapters().principal().caller_identity().await
    }

    /// Build the adapter set for `credentials` and swap it in together with
    /// `state`. Private so the two can never drift apart.
    // Building a set only configures clients; nothing here does I/O.
    fn rebuild_adapters(&self, state: SessionState, credentials: &CredentialSet) -> u64 {
        let mut current = self.current.write();
        let generation = current.adapters.generation() + 1;
        current.adapters = Arc::new(AdapterSet::build(
            self.factory.as_ref(),
            Some(credentials),
            generation,
        ));
        current.state = state;
        tracing::debug!(generation, "Installed adapter generation");
        generation
    }
}

// Unique to the millisecond only; two assumptions in the same millisecond
// share a session name, which STS accepts.
fn generate_session_name() -> String {
    format!("{}-{}", SESSION_NAME_PREFIX, Utc::now().timestamp_millis())
}
