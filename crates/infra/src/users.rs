//! User directory and the registration workflow.

use chrono::{DateTime, Utc};
use tracing::info;

use brigada_core::{DomainError, DomainResult, Entity, StationId, UserId};
use brigada_identity::{validate_and_canonicalize, NewUser, User};
use brigada_membership::MembershipStatus;

use crate::audit::{record_activity, AuditSink};
use crate::memberships::MembershipService;
use crate::memory::InMemoryTable;
use crate::notify::NotificationSender;

/// Explicit listing filter. An empty query matches everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub station: Option<StationId>,
    pub status: Option<MembershipStatus>,
    pub name_contains: Option<String>,
}

/// Stores user records and backstops RUT/email uniqueness.
#[derive(Default)]
pub struct UserDirectory {
    table: InMemoryTable<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            table: InMemoryTable::new(),
        }
    }

    pub fn get(&self, id: UserId) -> DomainResult<User> {
        self.table.get(id)?.ok_or(DomainError::NotFound)
    }

    /// Look a user up by RUT in any input shape; the query is canonicalized
    /// before comparison.
    pub fn find_by_rut(&self, raw: &str) -> DomainResult<Option<User>> {
        let rut = validate_and_canonicalize(raw)?;
        self.table
            .with_read(|rows| rows.values().find(|user| *user.rut() == rut).cloned())
    }

    pub fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let needle = email.trim().to_lowercase();
        self.table
            .with_read(|rows| rows.values().find(|user| user.email() == needle).cloned())
    }

    /// Insert with the uniqueness backstop; callers that pre-checked still
    /// go through this.
    pub fn insert(&self, user: User) -> DomainResult<()> {
        self.table.with_write(|rows| {
            Self::check_unique(rows.values(), &user)?;
            rows.insert(user.id(), user);
            Ok(())
        })
    }

    /// Register a new user: normalize every field, insert, and deliver the
    /// welcome notification.
    ///
    /// The notification is sent inside the same critical section as the
    /// insert; if delivery fails the insert is rolled back and the whole
    /// registration fails. The audit record is best-effort and happens
    /// after the user exists.
    pub fn register_user(
        &self,
        input: NewUser,
        actor: UserId,
        temp_password: &str,
        now: DateTime<Utc>,
        sender: &dyn NotificationSender,
        sink: &dyn AuditSink,
    ) -> DomainResult<User> {
        let user = User::register(UserId::new(), input, now)?;

        self.table.with_write(|rows| {
            Self::check_unique(rows.values(), &user)?;
            rows.insert(user.id(), user.clone());
            if let Err(err) = sender.send_welcome(&user, temp_password) {
                rows.remove(&user.id());
                return Err(DomainError::constraint(format!(
                    "registration aborted, welcome notification failed: {err}"
                )));
            }
            Ok(())
        })?;

        info!(user_id = %user.id(), "user registered");
        record_activity(sink, actor, "creó usuario", &user, None, now);
        Ok(user)
    }

    /// List users matching an explicit query. Station and status filters
    /// are resolved against the membership registry.
    pub fn search(
        &self,
        query: &UserQuery,
        memberships: &MembershipService,
    ) -> DomainResult<Vec<User>> {
        let needle = query.name_contains.as_deref().map(str::to_lowercase);
        let mut out = Vec::new();
        for user in self.table.list()? {
            if let Some(needle) = &needle {
                if !user.full_name().to_lowercase().contains(needle) {
                    continue;
                }
            }
            if query.station.is_some() || query.status.is_some() {
                let history = memberships.memberships_of(user.id())?;
                let hit = history.iter().any(|m| {
                    query.station.is_none_or(|s| m.station_id() == s)
                        && query.status.is_none_or(|st| m.status() == st)
                });
                if !hit {
                    continue;
                }
            }
            out.push(user);
        }
        out.sort_by_key(|user| user.full_name());
        Ok(out)
    }

    fn check_unique<'a>(
        existing: impl Iterator<Item = &'a User>,
        candidate: &User,
    ) -> DomainResult<()> {
        for user in existing {
            if user.rut() == candidate.rut() {
                return Err(DomainError::constraint(format!(
                    "a user with RUT {} already exists",
                    candidate.rut()
                )));
            }
            if user.email() == candidate.email() {
                return Err(DomainError::constraint(format!(
                    "a user with email {} already exists",
                    candidate.email()
                )));
            }
        }
        Ok(())
    }
}
