//! `brigada-membership` — the membership lifecycle state machine.
//!
//! A membership links one user to one station for a span of time, carries a
//! role set, and moves through ACTIVO/INACTIVO/FINALIZADO. FINALIZADO is
//! terminal and retained as the audit trail; memberships are never deleted in
//! normal operation.

pub mod membership;

pub use membership::{
    ActivateMembership, AssignRoles, DeactivateMembership, FinalizeMembership, Membership,
    MembershipCommand, MembershipEvent, MembershipStatus, OpenMembership,
};
