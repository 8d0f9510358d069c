//! Credential tools.
//!
//! [`AssumeRoleTool`] is the one tool that changes server state: on success,
//! every later S3 and IAM call runs with the assumed role's credentials.

mod assume_role;
mod caller_identity;

pub use assume_role::{AssumeRoleInput, AssumeRoleTool};
pub use caller_identity::{CallerIdentityInput, CallerIdentityTool};

use aws_readonly_core::{box_tool, DynTool};

/// All credential tools, in catalog order.
pub fn all_tools() -> Vec<Box<dyn DynTool>> {
    vec![box_tool(AssumeRoleTool), box_tool(CallerIdentityTool)]
}
