//! Membership application service.
//!
//! The aggregate enforces everything local to one membership; this service
//! owns the registry and enforces the one rule that spans aggregates: a user
//! holds at most one vigente (ACTIVO or INACTIVO) membership anywhere. Every
//! mutation takes the write lock once, so the check and the write are one
//! atomic step.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::info;

use brigada_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, ExpectedVersion, MembershipId, RoleId,
    StationId, UserId,
};
use brigada_membership::{
    ActivateMembership, AssignRoles, DeactivateMembership, FinalizeMembership, Membership,
    MembershipCommand, MembershipStatus, OpenMembership,
};
use brigada_rbac::{validate_role_assignment, Role};

/// Explicit filter for membership listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQuery {
    pub station: Option<StationId>,
    pub status: Option<MembershipStatus>,
}

#[derive(Default)]
struct MembershipRegistry {
    by_id: HashMap<MembershipId, Membership>,
    by_user: HashMap<UserId, Vec<MembershipId>>,
}

impl MembershipRegistry {
    fn of_user(&self, user: UserId) -> impl Iterator<Item = &Membership> {
        self.by_user
            .get(&user)
            .into_iter()
            .flatten()
            .filter_map(|id| self.by_id.get(id))
    }

    /// The membership a management action targets: the (user, station) record
    /// with the latest start date. Finalized history stays behind it.
    fn current_id(&self, user: UserId, station: StationId) -> Option<MembershipId> {
        self.of_user(user)
            .filter(|m| m.station_id() == station)
            .max_by_key(|m| (m.start_date(), *m.id_typed().as_uuid()))
            .map(|m| m.id_typed())
    }
}

#[derive(Default)]
pub struct MembershipService {
    registry: RwLock<MembershipRegistry>,
}

impl MembershipService {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, MembershipRegistry>> {
        self.registry
            .write()
            .map_err(|_| DomainError::constraint("membership registry lock poisoned"))
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, MembershipRegistry>> {
        self.registry
            .read()
            .map_err(|_| DomainError::constraint("membership registry lock poisoned"))
    }

    /// Open a membership for a user at a station.
    ///
    /// Rejected with `ConstraintViolation` while the user holds a vigente
    /// membership anywhere, including at another station. A finalized history
    /// never blocks re-entry.
    pub fn create(
        &self,
        user_id: UserId,
        station_id: StationId,
        now: DateTime<Utc>,
    ) -> DomainResult<Membership> {
        let mut registry = self.write()?;

        if let Some(open) = registry.of_user(user_id).find(|m| m.is_gestionable()) {
            return Err(DomainError::constraint(format!(
                "user already has a {} membership at station {}",
                open.status(),
                open.station_id()
            )));
        }

        let id = MembershipId::new();
        let mut membership = Membership::empty(id);
        drive(
            &mut membership,
            MembershipCommand::Open(OpenMembership {
                membership_id: id,
                user_id,
                station_id,
                occurred_at: now,
            }),
        )?;

        registry.by_id.insert(id, membership.clone());
        registry.by_user.entry(user_id).or_default().push(id);
        info!(membership_id = %id, user_id = %user_id, station_id = %station_id, "membership opened");
        Ok(membership)
    }

    pub fn deactivate(
        &self,
        user_id: UserId,
        station_id: StationId,
        expected: ExpectedVersion,
        now: DateTime<Utc>,
    ) -> DomainResult<Membership> {
        self.mutate_current(user_id, station_id, expected, |id| {
            MembershipCommand::Deactivate(DeactivateMembership {
                membership_id: id,
                occurred_at: now,
            })
        })
    }

    pub fn activate(
        &self,
        user_id: UserId,
        station_id: StationId,
        expected: ExpectedVersion,
        now: DateTime<Utc>,
    ) -> DomainResult<Membership> {
        self.mutate_current(user_id, station_id, expected, |id| {
            MembershipCommand::Activate(ActivateMembership {
                membership_id: id,
                occurred_at: now,
            })
        })
    }

    pub fn finalize(
        &self,
        user_id: UserId,
        station_id: StationId,
        expected: ExpectedVersion,
        now: DateTime<Utc>,
    ) -> DomainResult<Membership> {
        self.mutate_current(user_id, station_id, expected, |id| {
            MembershipCommand::Finalize(FinalizeMembership {
                membership_id: id,
                occurred_at: now,
            })
        })
    }

    /// Replace the current membership's role set, keeping only candidates
    /// assignable at the station. Stray ids are dropped (and logged), they
    /// never fail the request.
    pub fn assign_roles(
        &self,
        user_id: UserId,
        station_id: StationId,
        candidates: &[RoleId],
        catalog: &[Role],
        expected: ExpectedVersion,
        now: DateTime<Utc>,
    ) -> DomainResult<Membership> {
        let accepted = validate_role_assignment(station_id, candidates, catalog);
        self.mutate_current(user_id, station_id, expected, |id| {
            MembershipCommand::AssignRoles(AssignRoles {
                membership_id: id,
                role_ids: accepted.clone(),
                occurred_at: now,
            })
        })
    }

    pub fn current_membership(
        &self,
        user_id: UserId,
        station_id: StationId,
    ) -> DomainResult<Membership> {
        let registry = self.read()?;
        let id = registry
            .current_id(user_id, station_id)
            .ok_or(DomainError::NotFound)?;
        registry.by_id.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    /// The user's ACTIVO membership, wherever it is.
    pub fn active_membership(&self, user_id: UserId) -> DomainResult<Option<Membership>> {
        let registry = self.read()?;
        Ok(registry
            .of_user(user_id)
            .find(|m| m.status() == MembershipStatus::Activo)
            .cloned())
    }

    /// Full membership history of a user, finalized records included.
    pub fn memberships_of(&self, user_id: UserId) -> DomainResult<Vec<Membership>> {
        let registry = self.read()?;
        Ok(registry.of_user(user_id).cloned().collect())
    }

    pub fn member_query(&self, query: &MemberQuery) -> DomainResult<Vec<Membership>> {
        let registry = self.read()?;
        let mut out: Vec<Membership> = registry
            .by_id
            .values()
            .filter(|m| {
                query.station.is_none_or(|s| m.station_id() == s)
                    && query.status.is_none_or(|st| m.status() == st)
            })
            .cloned()
            .collect();
        out.sort_by_key(|m| (m.start_date(), *m.id_typed().as_uuid()));
        Ok(out)
    }

    fn mutate_current(
        &self,
        user_id: UserId,
        station_id: StationId,
        expected: ExpectedVersion,
        command: impl FnOnce(MembershipId) -> MembershipCommand,
    ) -> DomainResult<Membership> {
        let mut registry = self.write()?;
        let id = registry
            .current_id(user_id, station_id)
            .ok_or(DomainError::NotFound)?;
        let mut membership = registry
            .by_id
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound)?;

        expected.check(membership.version())?;
        drive(&mut membership, command(id))?;

        registry.by_id.insert(id, membership.clone());
        Ok(membership)
    }
}

fn drive(membership: &mut Membership, command: MembershipCommand) -> DomainResult<()> {
    let events = membership.handle(&command)?;
    for event in &events {
        membership.apply(event);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigada_core::Entity;
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        "2026-08-31T08:00:00Z".parse().unwrap()
    }

    fn later() -> DateTime<Utc> {
        "2026-09-15T08:00:00Z".parse().unwrap()
    }

    #[test]
    fn create_opens_an_activo_membership() {
        let service = MembershipService::new();
        let membership = service.create(UserId::new(), StationId::new(), now()).unwrap();
        assert_eq!(membership.status(), MembershipStatus::Activo);
        assert_eq!(membership.start_date(), now().date_naive());
    }

    #[test]
    fn second_vigente_membership_is_rejected_across_stations() {
        let service = MembershipService::new();
        let user = UserId::new();
        let home = StationId::new();
        service.create(user, home, now()).unwrap();

        // ACTIVO blocks.
        let err = service.create(user, StationId::new(), now()).unwrap_err();
        assert!(matches!(err, DomainError::ConstraintViolation(_)));

        // INACTIVO blocks too: the link still exists.
        service
            .deactivate(user, home, ExpectedVersion::Any, now())
            .unwrap();
        let err = service.create(user, StationId::new(), now()).unwrap_err();
        assert!(matches!(err, DomainError::ConstraintViolation(_)));
    }

    #[test]
    fn finalization_frees_the_user_and_history_is_retained() {
        let service = MembershipService::new();
        let user = UserId::new();
        let home = StationId::new();
        service.create(user, home, now()).unwrap();
        let finalized = service
            .finalize(user, home, ExpectedVersion::Any, now())
            .unwrap();
        assert_eq!(finalized.end_date(), Some(now().date_naive()));

        let second = service.create(user, StationId::new(), later()).unwrap();
        assert_eq!(second.status(), MembershipStatus::Activo);
        assert_eq!(service.memberships_of(user).unwrap().len(), 2);
    }

    #[test]
    fn current_membership_picks_the_latest_start_date() {
        let service = MembershipService::new();
        let user = UserId::new();
        let home = StationId::new();

        service.create(user, home, now()).unwrap();
        service
            .finalize(user, home, ExpectedVersion::Any, now())
            .unwrap();
        let rejoined = service.create(user, home, later()).unwrap();

        let current = service.current_membership(user, home).unwrap();
        assert_eq!(current.id_typed(), rejoined.id_typed());
        assert_eq!(current.status(), MembershipStatus::Activo);
    }

    #[test]
    fn missing_membership_is_not_found() {
        let service = MembershipService::new();
        let err = service
            .deactivate(UserId::new(), StationId::new(), ExpectedVersion::Any, now())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn stale_expected_version_is_rejected() {
        let service = MembershipService::new();
        let user = UserId::new();
        let home = StationId::new();
        service.create(user, home, now()).unwrap();

        let err = service
            .deactivate(user, home, ExpectedVersion::Exact(7), now())
            .unwrap_err();
        assert!(matches!(err, DomainError::ConstraintViolation(_)));

        service
            .deactivate(user, home, ExpectedVersion::Exact(1), now())
            .unwrap();
    }

    #[test]
    fn assign_roles_filters_through_the_catalog() {
        let service = MembershipService::new();
        let user = UserId::new();
        let home = StationId::new();
        service.create(user, home, now()).unwrap();

        let universal = Role::new(RoleId::new(), "Capitán", None, BTreeSet::new()).unwrap();
        let foreign = Role::new(
            RoleId::new(),
            "Maquinista",
            Some(StationId::new()),
            BTreeSet::new(),
        )
        .unwrap();
        let catalog = vec![universal.clone(), foreign.clone()];

        let membership = service
            .assign_roles(
                user,
                home,
                &[universal.id(), foreign.id()],
                &catalog,
                ExpectedVersion::Any,
                now(),
            )
            .unwrap();

        assert_eq!(membership.roles().len(), 1);
        assert!(membership.roles().contains(&universal.id()));
    }

    #[test]
    fn active_membership_sees_only_activo() {
        let service = MembershipService::new();
        let user = UserId::new();
        let home = StationId::new();
        service.create(user, home, now()).unwrap();
        assert!(service.active_membership(user).unwrap().is_some());

        service
            .deactivate(user, home, ExpectedVersion::Any, now())
            .unwrap();
        assert!(service.active_membership(user).unwrap().is_none());
    }

    #[test]
    fn member_query_filters_by_station_and_status() {
        let service = MembershipService::new();
        let home = StationId::new();
        let other = StationId::new();

        let a = UserId::new();
        let b = UserId::new();
        service.create(a, home, now()).unwrap();
        service.create(b, other, now()).unwrap();
        service
            .deactivate(b, other, ExpectedVersion::Any, now())
            .unwrap();

        let at_home = service
            .member_query(&MemberQuery {
                station: Some(home),
                status: None,
            })
            .unwrap();
        assert_eq!(at_home.len(), 1);

        let inactive = service
            .member_query(&MemberQuery {
                station: None,
                status: Some(MembershipStatus::Inactivo),
            })
            .unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].user_id(), b);
    }
}
