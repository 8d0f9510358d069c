//! Read-only AWS MCP server.
//!
//! Exposes S3 listing and reads, IAM lookups and STS role assumption as MCP
//! tools over stdio. Configuration comes from flags or the environment (see
//! [`config::ServerConfig`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use aws_readonly_server::{config::ServerConfig, run};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! run(config).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod server;

use std::sync::Arc;

use aws_readonly_core::{
    AdapterFactory, CredentialIssuer, Dispatcher, SessionManager, ToolRegistry,
};
use aws_readonly_tools::aws::{load_sdk_config, AwsAdapterFactory, StsIssuer};

pub use config::{LogLevel, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::AwsReadonlyServer;

/// Wire up the session, perform the startup role assumption if configured,
/// and build the catalog.
///
/// A failed startup assumption is fatal; the server never starts on the
/// ambient identity when a role was requested.
pub async fn bootstrap(
    config: &ServerConfig,
    factory: Arc<dyn AdapterFactory>,
    issuer: Arc<dyn CredentialIssuer>,
) -> ServerResult<AwsReadonlyServer> {
    let session = Arc::new(SessionManager::new(factory, issuer));

    if let Some(role_arn) = &config.assume_role_arn {
        session
            .assume_role(role_arn, config.session_duration)
            .await
            .map_err(|source| ServerError::StartupRole {
                role_arn: role_arn.clone(),
                source,
            })?;
    }

    let registry = ToolRegistry::with_tools(aws_readonly_tools::all_tools())?;
    tracing::debug!(tools = ?registry.names(), "Tool catalog built");

    Ok(AwsReadonlyServer::new(Arc::new(Dispatcher::new(
        registry, session,
    ))))
}

/// Start the server against AWS and serve stdio until the client goes away.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    tracing::info!(
        region = %config.region,
        assume_role = config.assume_role_arn.as_deref().unwrap_or("none"),
        "Starting AWS read-only MCP server"
    );

    let sdk_config = load_sdk_config(config.region.clone()).await;
    let factory = Arc::new(AwsAdapterFactory::new(sdk_config.clone()));
    let issuer = Arc::new(StsIssuer::new(&sdk_config));

    bootstrap(&config, factory, issuer).await?.serve_stdio().await
}
