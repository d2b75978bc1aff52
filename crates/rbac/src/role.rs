//! The role model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use brigada_core::{Describable, DomainError, DomainResult, Entity, RoleId, StationId};

use crate::permission::Permission;

/// A named bundle of permissions, either universal or scoped to one station.
///
/// Uniqueness is the store's concern: `(name, station)` unique when the role
/// is station-scoped, `name` unique among universal roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    station: Option<StationId>,
    permissions: BTreeSet<Permission>,
}

impl Role {
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        station: Option<StationId>,
        permissions: BTreeSet<Permission>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("role name must not be empty"));
        }
        Ok(Self {
            id,
            name,
            station,
            permissions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn station(&self) -> Option<StationId> {
        self.station
    }

    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Universal roles are visible and assignable at every station.
    pub fn is_universal(&self) -> bool {
        self.station.is_none()
    }

    pub fn is_visible_at(&self, station: StationId) -> bool {
        match self.station {
            None => true,
            Some(s) => s == station,
        }
    }

    /// Replace the whole permission set.
    pub fn set_permissions(&mut self, permissions: BTreeSet<Permission>) {
        self.permissions = permissions;
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> RoleId {
        self.id
    }
}

impl Describable for Role {
    fn display_text(&self) -> String {
        match self.station {
            None => format!("{} (Universal)", self.name),
            Some(station) => format!("{} ({})", self.name, station),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms() -> BTreeSet<Permission> {
        BTreeSet::from([Permission::new("acceso_personal", "Acceso a Personal")])
    }

    #[test]
    fn universal_role_is_visible_everywhere() {
        let role = Role::new(RoleId::new(), "Capitán", None, perms()).unwrap();
        assert!(role.is_universal());
        assert!(role.is_visible_at(StationId::new()));
        assert!(role.display_text().ends_with("(Universal)"));
    }

    #[test]
    fn scoped_role_is_visible_only_at_its_station() {
        let home = StationId::new();
        let role = Role::new(RoleId::new(), "Ayudante", Some(home), perms()).unwrap();
        assert!(!role.is_universal());
        assert!(role.is_visible_at(home));
        assert!(!role.is_visible_at(StationId::new()));
    }

    #[test]
    fn name_is_trimmed_and_must_be_non_empty() {
        let role = Role::new(RoleId::new(), "  Teniente ", None, perms()).unwrap();
        assert_eq!(role.name(), "Teniente");

        assert!(matches!(
            Role::new(RoleId::new(), "   ", None, perms()),
            Err(DomainError::Validation(_))
        ));
    }
}
