//! Role catalog with uniqueness enforcement.

use std::collections::BTreeSet;

use brigada_core::{DomainError, DomainResult, Entity, RoleId, StationId};
use brigada_rbac::{Permission, Role};

use crate::memory::InMemoryTable;

/// Stores roles and backstops the naming constraints:
/// `(name, station)` unique among station-scoped roles, `name` unique among
/// universal roles. A universal and a scoped role may share a name.
#[derive(Default)]
pub struct RoleDirectory {
    table: InMemoryTable<Role>,
}

impl RoleDirectory {
    pub fn new() -> Self {
        Self {
            table: InMemoryTable::new(),
        }
    }

    pub fn insert(&self, role: Role) -> DomainResult<()> {
        self.table.with_write(|rows| {
            let clash = rows.values().any(|existing| {
                existing.name() == role.name() && existing.station() == role.station()
            });
            if clash {
                return Err(DomainError::constraint(format!(
                    "role '{}' already exists in that scope",
                    role.name()
                )));
            }
            rows.insert(role.id(), role);
            Ok(())
        })
    }

    pub fn get(&self, id: RoleId) -> DomainResult<Role> {
        self.table.get(id)?.ok_or(DomainError::NotFound)
    }

    /// Fetch a role as seen from a station; a role scoped to a different
    /// station is indistinguishable from a missing one.
    pub fn get_visible(&self, id: RoleId, station: StationId) -> DomainResult<Role> {
        let role = self.get(id)?;
        if role.is_visible_at(station) {
            Ok(role)
        } else {
            Err(DomainError::NotFound)
        }
    }

    /// Roles assignable at a station: universal plus the station's own.
    pub fn assignable_roles(&self, station: StationId) -> DomainResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .table
            .list()?
            .into_iter()
            .filter(|role| role.is_visible_at(station))
            .collect();
        roles.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(roles)
    }

    /// The full catalog, for assignment filtering.
    pub fn catalog(&self) -> DomainResult<Vec<Role>> {
        self.table.list()
    }

    /// Swap a role's permission set in one step.
    pub fn replace_permissions(
        &self,
        id: RoleId,
        permissions: BTreeSet<Permission>,
    ) -> DomainResult<()> {
        self.table.with_write(|rows| {
            let role = rows.get_mut(&id).ok_or(DomainError::NotFound)?;
            role.set_permissions(permissions);
            Ok(())
        })
    }
}
