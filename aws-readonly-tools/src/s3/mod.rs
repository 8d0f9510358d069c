//! Read-only S3 tools.
//!
//! | Tool | Description |
//! |------|-------------|
//! | [`ListBucketsTool`] | List all buckets in the account |
//! | [`ListObjectsTool`] | List objects in a bucket, optionally under a prefix |
//! | [`GetObjectTool`] | Read an object's content as text |
//! | [`GetBucketPolicyTool`] | Read a bucket's policy document |

mod get_bucket_policy;
mod get_object;
mod list_buckets;
mod list_objects;

pub use get_bucket_policy::{GetBucketPolicyInput, GetBucketPolicyTool};
pub use get_object::{GetObjectInput, GetObjectTool};
pub use list_buckets::{ListBucketsInput, ListBucketsTool};
pub use list_objects::{ListObjectsInput, ListObjectsTool};

use aws_readonly_core::{box_tool, DynTool};

/// All S3 tools, in catalog order.
pub fn all_tools() -> Vec<Box<dyn DynTool>> {
    vec![
        box_tool(ListBucketsTool),
        box_tool(ListObjectsTool),
        box_tool(GetObjectTool),
        box_tool(GetBucketPolicyTool),
    ]
}
