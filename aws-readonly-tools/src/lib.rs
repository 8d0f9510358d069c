//! Read-only AWS tools and the SDK adapters behind them.
//!
//! Tool groups are feature-gated (`s3`, `iam`, `sts`, all on by default).
//! [`all_tools`] returns every enabled tool in catalog order.

pub mod aws;
#[cfg(feature = "iam")]
pub mod iam;
#[cfg(feature = "s3")]
pub mod s3;
#[cfg(feature = "sts")]
pub mod sts;

use aws_readonly_core::DynTool;

/// Every enabled tool, S3 first, then IAM, then credential tools.
pub fn all_tools() -> Vec<Box<dyn DynTool>> {
    let mut tools = Vec::new();
    #[cfg(feature = "s3")]
    tools.extend(s3::all_tools());
    #[cfg(feature = "iam")]
    tools.extend(iam::all_tools());
    #[cfg(feature = "sts")]
    tools.extend(sts::all_tools());
    tools
}

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use aws_readonly_core::schema::{narrow, require_non_empty, require_range};
    pub use aws_readonly_core::{
        SessionManager, Tool, ToolError, ToolResult, ValidateInput, ValidationError,
    };
    pub use schemars::JsonSchema;
    pub use serde::{Deserialize, Serialize};
}
