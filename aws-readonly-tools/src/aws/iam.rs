use async_trait::async_trait;
use aws_readonly_core::{
    IdentityDirectory, PolicyInfo, PolicyScope, ProviderError, RoleInfo, UserInfo,
};
use aws_sdk_iam::types::{Policy, PolicyScopeType, Role, User};
use aws_sdk_iam::Client;

use super::{service_error, to_utc};

/// [`IdentityDirectory`] over an IAM client.
#[derive(Clone, Debug)]
pub struct IamDirectory {
    client: Client,
}

impl IamDirectory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        user_name: user.user_name().to_string(),
        user_id: user.user_id().to_string(),
        arn: user.arn().to_string(),
        create_date: to_utc(user.create_date()),
        password_last_used: user.password_last_used().and_then(to_utc),
    }
}

fn role_info(role: &Role) -> RoleInfo {
    RoleInfo {
        role_name: role.role_name().to_string(),
        role_id: role.role_id().to_string(),
        arn: role.arn().to_string(),
        create_date: to_utc(role.create_date()),
        description: role.description().map(str::to_string),
    }
}

fn policy_info(policy: &Policy) -> PolicyInfo {
    PolicyInfo {
        policy_name: policy.policy_name().unwrap_or_default().to_string(),
        policy_id: policy.policy_id().unwrap_or_default().to_string(),
        arn: policy.arn().unwrap_or_default().to_string(),
        create_date: policy.create_date().and_then(to_utc),
        description: policy.description().map(str::to_string),
    }
}

fn scope_type(scope: PolicyScope) -> PolicyScopeType {
    match scope {
        PolicyScope::All => PolicyScopeType::All,
        PolicyScope::Aws => PolicyScopeType::Aws,
        PolicyScope::Local => PolicyScopeType::Local,
    }
}

#[async_trait]
impl IdentityDirectory for IamDirectory {
    async fn list_users(&self, max_items: i32) -> Result<Vec<UserInfo>, ProviderError> {
        tracing::debug!(max_items, "Listing IAM users");
        let output = self
            .client
            .list_users()
            .max_items(max_items)
            .send()
            .await
            .map_err(|e| service_error("ListUsers", e))?;
        Ok(output.users().iter().map(user_info).collect())
    }

    async fn get_user(&self, user_name: &str) -> Result<UserInfo, ProviderError> {
        tracing::debug!(user_name, "Getting IAM user");
        let output = match self.client.get_user().user_name(user_name).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|s| s.is_no_such_entity_exception()) => {
                return Err(ProviderError::not_found("User", user_name));
            }
            Err(e) => return Err(service_error("GetUser", e)),
        };
        output
            .user()
            .map(user_info)
            .ok_or_else(|| ProviderError::not_found("User", user_name))
    }

    async fn list_roles(&self, max_items: i32) -> Result<Vec<RoleInfo>, ProviderError> {
        tracing::debug!(max_items, "Listing IAM roles");
        let output = self
            .client
            .list_roles()
            .max_items(max_items)
            .send()
            .await
            .map_err(|e| service_error("ListRoles", e))?;
        Ok(output.roles().iter().map(role_info).collect())
    }

    async fn get_role(&self, role_name: &str) -> Result<RoleInfo, ProviderError> {
        tracing::debug!(role_name, "Getting IAM role");
        let output = match self.client.get_role().role_name(role_name).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|s| s.is_no_such_entity_exception()) => {
                return Err(ProviderError::not_found("Role", role_name));
            }
            Err(e) => return Err(service_error("GetRole", e)),
        };
        output
            .role()
            .map(role_info)
            .ok_or_else(|| ProviderError::not_found("Role", role_name))
    }

    async fn list_policies(
        &self,
        scope: PolicyScope,
        max_items: i32,
    ) -> Result<Vec<PolicyInfo>, ProviderError> {
        tracing::debug!(scope = %scope, max_items, "Listing IAM policies");
        let output = self
            .client
            .list_policies()
            .scope(scope_type(scope))
            .max_items(max_items)
            .send()
            .await
            .map_err(|e| service_error("ListPolicies", e))?;
        Ok(output.policies().iter().map(policy_info).collect())
    }

    async fn get_policy(&self, policy_arn: &str) -> Result<PolicyInfo, ProviderError> {
        tracing::debug!(policy_arn, "Getting IAM policy");
        let output = match self.client.get_policy().policy_arn(policy_arn).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|s| s.is_no_such_entity_exception()) => {
                return Err(ProviderError::not_found("Policy", policy_arn));
            }
            Err(e) => return Err(service_error("GetPolicy", e)),
        };
        output
            .policy()
            .map(policy_info)
            .ok_or_else(|| ProviderError::not_found("Policy", policy_arn))
    }
}
