use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use brigada_core::{
    Aggregate, AggregateRoot, Describable, DomainError, Event, MembershipId, RoleId, StationId,
    UserId,
};

/// Membership lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MembershipStatus {
    Activo,
    Inactivo,
    Finalizado,
}

impl core::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MembershipStatus::Activo => f.write_str("ACTIVO"),
            MembershipStatus::Inactivo => f.write_str("INACTIVO"),
            MembershipStatus::Finalizado => f.write_str("FINALIZADO"),
        }
    }
}

/// Aggregate root: a user's time-bounded association with a station.
///
/// # Invariants
/// - `start_date` is set on open and never changes.
/// - `end_date` is set exactly once, on finalization.
/// - FINALIZADO is terminal: no command mutates a finalized membership.
/// - Roles are replaced as a whole set, never incrementally.
///
/// The system-wide invariant (at most one ACTIVO membership per user) spans
/// aggregates and is enforced by the application service that opens
/// memberships; the aggregate enforces everything local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    id: MembershipId,
    user_id: UserId,
    station_id: StationId,
    status: MembershipStatus,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    roles: BTreeSet<RoleId>,
    version: u64,
    created: bool,
}

impl Membership {
    /// Create an empty, not-yet-opened aggregate instance for rehydration.
    pub fn empty(id: MembershipId) -> Self {
        Self {
            id,
            user_id: UserId::from_uuid(uuid::Uuid::nil()),
            station_id: StationId::from_uuid(uuid::Uuid::nil()),
            status: MembershipStatus::Activo,
            start_date: NaiveDate::MIN,
            end_date: None,
            roles: BTreeSet::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> MembershipId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn station_id(&self) -> StationId {
        self.station_id
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn roles(&self) -> &BTreeSet<RoleId> {
        &self.roles
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Whether management actions (edit, role assignment, status changes) are
    /// allowed: ACTIVO or INACTIVO, never FINALIZADO.
    pub fn is_gestionable(&self) -> bool {
        matches!(
            self.status,
            MembershipStatus::Activo | MembershipStatus::Inactivo
        )
    }
}

impl AggregateRoot for Membership {
    type Id = MembershipId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Describable for Membership {
    fn display_text(&self) -> String {
        format!(
            "membership of {} at {} ({})",
            self.user_id, self.station_id, self.status
        )
    }
}

/// Command: open a membership (user joins a station).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenMembership {
    pub membership_id: MembershipId,
    pub user_id: UserId,
    pub station_id: StationId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: move ACTIVO → INACTIVO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateMembership {
    pub membership_id: MembershipId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: move INACTIVO → ACTIVO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateMembership {
    pub membership_id: MembershipId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: close the membership permanently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeMembership {
    pub membership_id: MembershipId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: replace the membership's role set (set-replace, not add).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRoles {
    pub membership_id: MembershipId,
    pub role_ids: Vec<RoleId>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipCommand {
    Open(OpenMembership),
    Deactivate(DeactivateMembership),
    Activate(ActivateMembership),
    Finalize(FinalizeMembership),
    AssignRoles(AssignRoles),
}

/// Event: membership opened (status ACTIVO, start date set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipOpened {
    pub membership_id: MembershipId,
    pub user_id: UserId,
    pub station_id: StationId,
    pub start_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipDeactivated {
    pub membership_id: MembershipId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipActivated {
    pub membership_id: MembershipId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: membership finalized (terminal, end date set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipFinalized {
    pub membership_id: MembershipId,
    pub end_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Event: role set replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesAssigned {
    pub membership_id: MembershipId,
    pub role_ids: BTreeSet<RoleId>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipEvent {
    Opened(MembershipOpened),
    Deactivated(MembershipDeactivated),
    Activated(MembershipActivated),
    Finalized(MembershipFinalized),
    RolesAssigned(RolesAssigned),
}

impl Event for MembershipEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MembershipEvent::Opened(_) => "membership.membership.opened",
            MembershipEvent::Deactivated(_) => "membership.membership.deactivated",
            MembershipEvent::Activated(_) => "membership.membership.activated",
            MembershipEvent::Finalized(_) => "membership.membership.finalized",
            MembershipEvent::RolesAssigned(_) => "membership.membership.roles_assigned",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MembershipEvent::Opened(e) => e.occurred_at,
            MembershipEvent::Deactivated(e) => e.occurred_at,
            MembershipEvent::Activated(e) => e.occurred_at,
            MembershipEvent::Finalized(e) => e.occurred_at,
            MembershipEvent::RolesAssigned(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Membership {
    type Command = MembershipCommand;
    type Event = MembershipEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            MembershipEvent::Opened(e) => {
                self.id = e.membership_id;
                self.user_id = e.user_id;
                self.station_id = e.station_id;
                self.status = MembershipStatus::Activo;
                self.start_date = e.start_date;
                self.end_date = None;
                self.roles.clear();
                self.created = true;
            }
            MembershipEvent::Deactivated(_) => {
                self.status = MembershipStatus::Inactivo;
            }
            MembershipEvent::Activated(_) => {
                self.status = MembershipStatus::Activo;
            }
            MembershipEvent::Finalized(e) => {
                self.status = MembershipStatus::Finalizado;
                self.end_date = Some(e.end_date);
            }
            MembershipEvent::RolesAssigned(e) => {
                self.roles = e.role_ids.clone();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            MembershipCommand::Open(cmd) => self.handle_open(cmd),
            MembershipCommand::Deactivate(cmd) => self.handle_deactivate(cmd),
            MembershipCommand::Activate(cmd) => self.handle_activate(cmd),
            MembershipCommand::Finalize(cmd) => self.handle_finalize(cmd),
            MembershipCommand::AssignRoles(cmd) => self.handle_assign_roles(cmd),
        }
    }
}

impl Membership {
    fn ensure_exists(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn ensure_gestionable(&self) -> Result<(), DomainError> {
        if !self.is_gestionable() {
            return Err(DomainError::illegal_transition(
                "membership is finalized and can no longer be managed",
            ));
        }
        Ok(())
    }

    fn handle_open(&self, cmd: &OpenMembership) -> Result<Vec<MembershipEvent>, DomainError> {
        if self.created {
            return Err(DomainError::constraint("membership already exists"));
        }

        Ok(vec![MembershipEvent::Opened(MembershipOpened {
            membership_id: cmd.membership_id,
            user_id: cmd.user_id,
            station_id: cmd.station_id,
            start_date: cmd.occurred_at.date_naive(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_deactivate(
        &self,
        cmd: &DeactivateMembership,
    ) -> Result<Vec<MembershipEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_gestionable()?;

        if self.status != MembershipStatus::Activo {
            return Err(DomainError::illegal_transition(format!(
                "cannot deactivate a membership in status {}",
                self.status
            )));
        }

        Ok(vec![MembershipEvent::Deactivated(MembershipDeactivated {
            membership_id: cmd.membership_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_activate(
        &self,
        cmd: &ActivateMembership,
    ) -> Result<Vec<MembershipEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_gestionable()?;

        if self.status != MembershipStatus::Inactivo {
            return Err(DomainError::illegal_transition(format!(
                "cannot activate a membership in status {}",
                self.status
            )));
        }

        Ok(vec![MembershipEvent::Activated(MembershipActivated {
            membership_id: cmd.membership_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_finalize(
        &self,
        cmd: &FinalizeMembership,
    ) -> Result<Vec<MembershipEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_gestionable()?;

        Ok(vec![MembershipEvent::Finalized(MembershipFinalized {
            membership_id: cmd.membership_id,
            end_date: cmd.occurred_at.date_naive(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_assign_roles(&self, cmd: &AssignRoles) -> Result<Vec<MembershipEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_gestionable()?;

        // Set-replace semantics: duplicates and ordering in the input are
        // irrelevant.
        let role_ids: BTreeSet<RoleId> = cmd.role_ids.iter().copied().collect();

        Ok(vec![MembershipEvent::RolesAssigned(RolesAssigned {
            membership_id: cmd.membership_id,
            role_ids,
            occurred_at: cmd.occurred_at,
        })])
    }
}
