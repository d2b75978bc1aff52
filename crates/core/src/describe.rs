//! Display capability for activity logging.

/// Capability interface for entities that can appear as the target of an
/// activity-log entry ("Admin X modified Role Y").
///
/// The audit layer depends only on this trait, never on concrete entity
/// types, so new loggable entities plug in without touching the sink. The
/// returned text is also the durable fallback representation kept in the log
/// after the target itself is gone.
pub trait Describable {
    /// Short, human-readable description of the entity.
    fn display_text(&self) -> String;
}
