//! Startup errors for the server.
//!
//! Tool failures never reach this type; they are reported inside the tool
//! result envelope. Everything here aborts the process.

use aws_readonly_core::{ProviderError, RegistryError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The tool catalog could not be built.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// `AWS_ASSUME_ROLE_ARN` was set and the assumption failed.
    #[error("Failed to assume startup role {role_arn}: {source}")]
    StartupRole {
        role_arn: String,
        #[source]
        source: ProviderError,
    },

    /// The stdio transport failed to start or stopped abnormally.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
