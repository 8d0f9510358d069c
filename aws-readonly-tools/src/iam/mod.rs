//! Read-only IAM tools.
//!
//! | Tool | Description |
//! |------|-------------|
//! | [`ListUsersTool`] | List users |
//! | [`GetUserTool`] | Get one user by name |
//! | [`ListRolesTool`] | List roles |
//! | [`GetRoleTool`] | Get one role by name |
//! | [`ListPoliciesTool`] | List managed policies by scope |
//! | [`GetPolicyTool`] | Get one managed policy by ARN |

mod get_policy;
mod get_role;
mod get_user;
mod list_policies;
mod list_roles;
mod list_users;

pub use get_policy::{GetPolicyInput, GetPolicyTool};
pub use get_role::{GetRoleInput, GetRoleTool};
pub use get_user::{GetUserInput, GetUserTool};
pub use list_policies::{ListPoliciesInput, ListPoliciesTool};
pub use list_roles::{ListRolesInput, ListRolesTool};
pub use list_users::{ListUsersInput, ListUsersTool};

use aws_readonly_core::{box_tool, DynTool};

/// All IAM tools, in catalog order.
pub fn all_tools() -> Vec<Box<dyn DynTool>> {
    vec![
        box_tool(ListUsersTool),
        box_tool(GetUserTool),
        box_tool(ListRolesTool),
        box_tool(GetRoleTool),
        box_tool(ListPoliciesTool),
        box_tool(GetPolicyTool),
    ]
}
