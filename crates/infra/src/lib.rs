//! `brigada-infra` — in-memory services tying the domain crates together.
//!
//! Stores here are transactional backstops, not the source of business
//! rules: the domain crates decide, infra makes the check-and-write atomic
//! and enforces the uniqueness constraints that span records.

pub mod audit;
pub mod memberships;
pub mod memory;
pub mod notify;
pub mod roles;
pub mod users;

pub use audit::{
    record_activity, ActivityEntry, AuditError, AuditSink, FailingAuditSink, InMemoryAuditSink,
};
pub use memberships::{MemberQuery, MembershipService};
pub use memory::InMemoryTable;
pub use notify::{
    FailingNotificationSender, InMemoryNotificationSender, NotificationSender, NotifyError,
    WelcomeMessage,
};
pub use roles::RoleDirectory;
pub use users::{UserDirectory, UserQuery};
