//! `brigada-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error taxonomy shared by every module, strongly-typed identifiers, the
//! aggregate/entity seams, and the `Describable` capability used by activity
//! logging.

pub mod aggregate;
pub mod describe;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use describe::Describable;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{MembershipId, RoleId, StationId, UserId};
