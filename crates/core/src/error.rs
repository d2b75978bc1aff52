//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Transport and
/// rendering concerns belong to the hosting application.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed identifier/phone/name input. Always recoverable, surfaced as
    /// a field-level message.
    #[error("parse error: {0}")]
    Parse(String),

    /// Well-formed RUT whose check digit does not match the Modulo-11 checksum
    /// of the body. Distinct from `Parse`.
    #[error("check digit mismatch: got '{supplied}', expected '{computed}'")]
    ChecksumMismatch { supplied: char, computed: char },

    /// A value failed a deterministic validation rule (range, emptiness).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A membership state change violates the lifecycle state machine.
    /// Distinct from `NotFound` so callers can branch on it.
    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    /// The referenced entity does not exist, or is not visible within the
    /// caller's station scope. Scope mismatches surface as `NotFound` so
    /// existence is never confirmed to unauthorized callers.
    #[error("not found")]
    NotFound,

    /// A storage-layer uniqueness constraint tripped despite precondition
    /// checks (race-condition backstop). Surfaced as "already exists".
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

impl DomainError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn illegal_transition(msg: impl Into<String>) -> Self {
        Self::IllegalTransition(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::ConstraintViolation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
