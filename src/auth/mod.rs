//! Caller roles and the admin authorization gate.

use serde::{Deserialize, Serialize};

/// The role a caller acts under.
///
/// - `Admin`: may resolve incidents
/// - `Tenant`: may submit and list
/// - `Anonymous`: no credentials presented; may submit and list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Tenant,
    Anonymous,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Tenant => "tenant",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Identity of whoever is invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub role: Role,
}

impl CallerContext {
    pub fn admin() -> Self {
        Self { role: Role::Admin }
    }

    pub fn tenant() -> Self {
        Self { role: Role::Tenant }
    }

    pub fn anonymous() -> Self {
        Self {
            role: Role::Anonymous,
        }
    }
}

impl Default for CallerContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Decides whether a caller may perform privileged mutations.
///
/// Implementations must be pure: no side effects, no shared mutable state.
pub trait Authorizer: Send + Sync {
    fn is_authorized_admin(&self, caller: &CallerContext) -> bool;
}

/// Grants admin capability only to callers holding the `Admin` role.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

impl Authorizer for RoleAuthorizer {
    fn is_authorized_admin(&self, caller: &CallerContext) -> bool {
        caller.role == Role::Admin
    }
}

/// Grants admin capability to every caller.
///
/// Performs no identity check at all. Only for local demos; never deploy this.
#[derive(Debug, Clone, Copy)]
pub struct PermissiveAuthorizer;

impl PermissiveAuthorizer {
    pub fn new() -> Self {
        tracing::warn!("Permissive authorizer enabled: every caller is treated as admin");
        Self
    }
}

impl Default for PermissiveAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Authorizer for PermissiveAuthorizer {
    fn is_authorized_admin(&self, _caller: &CallerContext) -> bool {
        true
    }
}
