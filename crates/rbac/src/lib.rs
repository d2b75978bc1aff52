//! `brigada-rbac` — roles, permissions and authorization policy.
//!
//! Roles are either universal (visible at every station) or scoped to a
//! single station. A membership carries a role set; the effective permission
//! set is the union across those roles. Authorization for an operation is an
//! ordered chain of pure predicates evaluated before the handler runs.

pub mod permission;
pub mod policy;
pub mod resolve;
pub mod role;
pub mod taxonomy;

pub use permission::{access_codename, Permission, PermissionKind};
pub use policy::{
    AuthzContext, AuthzPredicate, Decision, DenyReason, PolicyChain, RequireGestionable,
    RequireModuleAccess, RequirePermission, RequireSameStation,
};
pub use resolve::{aggregate_permissions, assignable_roles, validate_role_assignment};
pub use role::Role;
pub use taxonomy::{group_by_module, ModuleGroup};
