//! # aws-readonly-core
//!
//! Core of a read-only AWS tool server: the tool contract, input validation,
//! the credential session, and dispatch.
//!
//! The crate knows nothing about any SDK or wire protocol. Cloud access goes
//! through the adapter traits in [`provider`]; the protocol layer talks to a
//! [`Dispatcher`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use aws_readonly_core::{Dispatcher, SessionManager, ToolRegistry};
//!
//! let session = Arc::new(SessionManager::new(factory, issuer));
//! let registry = ToolRegistry::with_tools(aws_readonly_tools::all_tools())?;
//! let dispatcher = Dispatcher::new(registry, session);
//!
//! let response = dispatcher.dispatch("list_s3_buckets", None).await;
//! println!("{}", response.content);
//! ```
//!
//! ## Feature Flags
//!
//! - `test-utils` - in-memory mock adapters for driving tools in tests

pub mod dispatch;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod session;
pub mod tool;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dispatch::{Dispatcher, ToolResponse};
pub use provider::{
    AdapterFactory, AdapterSet, AssumedCredentials, BucketInfo, CallerIdentity, CredentialIssuer,
    CredentialSet, IdentityDirectory, ObjectInfo, ObjectStorage, PolicyInfo, PolicyScope,
    PrincipalLookup, ProviderError, RoleInfo, UserInfo, format_timestamp,
};
pub use registry::{RegistryError, ToolDescriptor, ToolRegistry};
pub use schema::{parse_input, ValidateInput, ValidationError};
pub use session::{SessionManager, SessionState};
pub use tool::{box_tool, DynTool, Tool, ToolError, ToolFuture, ToolResult};
