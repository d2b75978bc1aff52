//! Ordered authorization predicate chain.
//!
//! Each protected operation declares an explicit, ordered list of predicates
//! that must all allow before the handler runs. The first deny wins and
//! short-circuits the rest.

use std::collections::HashSet;

use brigada_core::{DomainError, DomainResult, StationId, UserId};
use brigada_membership::MembershipStatus;

use crate::permission::access_codename;

/// Everything a predicate may look at, resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzContext {
    pub user_id: UserId,
    /// Station the request is acting within.
    pub station_id: StationId,
    /// Status of the membership the request targets, when there is one.
    pub membership_status: Option<MembershipStatus>,
    /// Effective permission codenames (union across the caller's roles).
    pub permissions: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    MissingPermission(String),
    /// Target membership is FINALIZADO (or absent) and cannot be managed.
    NotGestionable,
    /// Target belongs to a different station than the caller's scope.
    StationMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl DenyReason {
    /// Map a denial to the error surfaced at the boundary.
    ///
    /// A scope mismatch is reported as `NotFound`, never as a permission
    /// problem: callers must not learn whether the target exists outside
    /// their station. The error model carries no forbidden variant
    /// (transport concerns belong to the hosting application), so a missing
    /// permission rides `Validation` and an unmanageable target rides
    /// `IllegalTransition`.
    pub fn into_domain_error(self) -> DomainError {
        match self {
            DenyReason::StationMismatch => DomainError::NotFound,
            DenyReason::MissingPermission(codename) => {
                DomainError::validation(format!("access denied: missing permission '{codename}'"))
            }
            DenyReason::NotGestionable => {
                DomainError::illegal_transition("membership is finalized and can no longer be managed")
            }
        }
    }
}

pub trait AuthzPredicate {
    fn evaluate(&self, ctx: &AuthzContext) -> Decision;
}

/// An explicit, ordered predicate list.
///
/// Order is part of the policy: put the cheap scope checks first so a
/// cross-station probe is answered with NotFound before any permission
/// detail leaks.
#[derive(Default)]
pub struct PolicyChain {
    predicates: Vec<Box<dyn AuthzPredicate>>,
}

impl PolicyChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: impl AuthzPredicate + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Evaluate the chain in order; the first deny wins.
    pub fn evaluate(&self, ctx: &AuthzContext) -> Decision {
        for predicate in &self.predicates {
            if let Decision::Deny(reason) = predicate.evaluate(ctx) {
                return Decision::Deny(reason);
            }
        }
        Decision::Allow
    }

    /// Evaluate and convert a denial into the boundary error.
    pub fn authorize(&self, ctx: &AuthzContext) -> DomainResult<()> {
        match self.evaluate(ctx) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason.into_domain_error()),
        }
    }
}

/// Require the `acceso_<module>` permission.
pub struct RequireModuleAccess {
    codename: String,
}

impl RequireModuleAccess {
    pub fn new(module: &str) -> Self {
        Self {
            codename: access_codename(module),
        }
    }
}

impl AuthzPredicate for RequireModuleAccess {
    fn evaluate(&self, ctx: &AuthzContext) -> Decision {
        if ctx.permissions.contains(&self.codename) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::MissingPermission(self.codename.clone()))
        }
    }
}

/// Require an exact permission codename.
pub struct RequirePermission {
    codename: String,
}

impl RequirePermission {
    pub fn new(codename: impl Into<String>) -> Self {
        Self {
            codename: codename.into(),
        }
    }
}

impl AuthzPredicate for RequirePermission {
    fn evaluate(&self, ctx: &AuthzContext) -> Decision {
        if ctx.permissions.contains(&self.codename) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::MissingPermission(self.codename.clone()))
        }
    }
}

/// Require the target membership to be manageable (ACTIVO or INACTIVO).
pub struct RequireGestionable;

impl AuthzPredicate for RequireGestionable {
    fn evaluate(&self, ctx: &AuthzContext) -> Decision {
        match ctx.membership_status {
            Some(MembershipStatus::Activo) | Some(MembershipStatus::Inactivo) => Decision::Allow,
            _ => Decision::Deny(DenyReason::NotGestionable),
        }
    }
}

/// Require the request to act within the given station.
pub struct RequireSameStation {
    station: StationId,
}

impl RequireSameStation {
    pub fn new(station: StationId) -> Self {
        Self { station }
    }
}

impl AuthzPredicate for RequireSameStation {
    fn evaluate(&self, ctx: &AuthzContext) -> Decision {
        if ctx.station_id == self.station {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::StationMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(codenames: &[&str], status: Option<MembershipStatus>) -> AuthzContext {
        AuthzContext {
            user_id: UserId::new(),
            station_id: StationId::new(),
            membership_status: status,
            permissions: codenames.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn empty_chain_allows() {
        let chain = PolicyChain::new();
        assert!(chain.evaluate(&ctx(&[], None)).is_allow());
    }

    #[test]
    fn first_deny_wins_in_declared_order() {
        let ctx = ctx(&[], Some(MembershipStatus::Finalizado));
        let chain = PolicyChain::new()
            .with(RequireGestionable)
            .with(RequireModuleAccess::new("personal"));

        // Both predicates deny; the first one declared is the one reported.
        assert_eq!(
            chain.evaluate(&ctx),
            Decision::Deny(DenyReason::NotGestionable)
        );
    }

    #[test]
    fn module_access_checks_the_acceso_codename() {
        let allowed = ctx(&["acceso_personal"], None);
        let denied = ctx(&["accion_personal_crear"], None);
        let predicate = RequireModuleAccess::new("personal");

        assert!(predicate.evaluate(&allowed).is_allow());
        assert_eq!(
            predicate.evaluate(&denied),
            Decision::Deny(DenyReason::MissingPermission("acceso_personal".to_string()))
        );
    }

    #[test]
    fn gestionable_accepts_activo_and_inactivo_only() {
        let predicate = RequireGestionable;
        assert!(predicate.evaluate(&ctx(&[], Some(MembershipStatus::Activo))).is_allow());
        assert!(predicate.evaluate(&ctx(&[], Some(MembershipStatus::Inactivo))).is_allow());
        assert!(!predicate.evaluate(&ctx(&[], Some(MembershipStatus::Finalizado))).is_allow());
        assert!(!predicate.evaluate(&ctx(&[], None)).is_allow());
    }

    #[test]
    fn station_mismatch_surfaces_as_not_found() {
        let context = ctx(&["acceso_personal"], Some(MembershipStatus::Activo));
        let chain = PolicyChain::new()
            .with(RequireSameStation::new(StationId::new()))
            .with(RequireModuleAccess::new("personal"));

        let err = chain.authorize(&context).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn missing_permission_surfaces_as_validation() {
        let context = ctx(&[], Some(MembershipStatus::Activo));
        let chain = PolicyChain::new().with(RequireModuleAccess::new("personal"));

        let err = chain.authorize(&context).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // Never NotFound: only scope mismatches hide the target.
        assert_ne!(err, DomainError::NotFound);
    }

    #[test]
    fn full_chain_allows_a_well_formed_request() {
        let context = ctx(
            &["acceso_personal", "accion_personal_editar"],
            Some(MembershipStatus::Activo),
        );
        let chain = PolicyChain::new()
            .with(RequireSameStation::new(context.station_id))
            .with(RequireModuleAccess::new("personal"))
            .with(RequirePermission::new("accion_personal_editar"))
            .with(RequireGestionable);

        assert!(chain.authorize(&context).is_ok());
    }
}
