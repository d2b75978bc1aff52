//! Role resolution: visibility, permission aggregation, assignment filtering.
//!
//! Everything here is pure policy over an in-memory role catalog.
//! - No IO
//! - No panics

use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use brigada_core::{Entity, RoleId, StationId};

use crate::permission::Permission;
use crate::role::Role;

/// Roles visible at a station: the universal set plus the station's own.
///
/// This is the sole visibility boundary; pickers, validators and permission
/// resolution all go through it.
pub fn assignable_roles(station: StationId, catalog: &[Role]) -> Vec<&Role> {
    catalog
        .iter()
        .filter(|role| role.is_visible_at(station))
        .collect()
}

/// Union of permissions across a set of roles.
///
/// Duplicates collapse; the result is independent of role order.
pub fn aggregate_permissions<'a, I>(roles: I) -> BTreeSet<Permission>
where
    I: IntoIterator<Item = &'a Role>,
{
    roles
        .into_iter()
        .flat_map(|role| role.permissions().iter().cloned())
        .collect()
}

/// Filter a candidate role-id list down to the ids assignable at `station`.
///
/// Preserves candidate order and drops duplicates. Ids that are unknown or
/// not visible at the station are silently removed from the result; each
/// drop is logged as a security event, but the assignment as a whole never
/// fails because of a stray id.
pub fn validate_role_assignment(
    station: StationId,
    candidates: &[RoleId],
    catalog: &[Role],
) -> Vec<RoleId> {
    let visible: HashSet<RoleId> = catalog
        .iter()
        .filter(|role| role.is_visible_at(station))
        .map(|role| role.id())
        .collect();

    let mut seen = HashSet::new();
    let mut accepted = Vec::new();
    for id in candidates {
        if !seen.insert(*id) {
            continue;
        }
        if visible.contains(id) {
            accepted.push(*id);
        } else {
            warn!(
                role_id = %id,
                station_id = %station,
                "dropping role id not assignable at station"
            );
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, station: Option<StationId>, codenames: &[&'static str]) -> Role {
        let permissions = codenames
            .iter()
            .map(|c| Permission::new(*c, c.to_string()))
            .collect();
        Role::new(RoleId::new(), name, station, permissions).unwrap()
    }

    #[test]
    fn assignable_is_universal_union_station_scoped() {
        let home = StationId::new();
        let other = StationId::new();
        let catalog = vec![
            role("Capitán", None, &["acceso_personal"]),
            role("Ayudante", Some(home), &["acceso_material"]),
            role("Maquinista", Some(other), &["acceso_material"]),
        ];

        let visible = assignable_roles(home, &catalog);
        let names: Vec<&str> = visible.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Capitán", "Ayudante"]);
    }

    #[test]
    fn permissions_union_collapses_duplicates() {
        let a = role("A", None, &["acceso_personal", "accion_personal_crear"]);
        let b = role("B", None, &["acceso_personal", "accion_personal_editar"]);

        let union = aggregate_permissions([&a, &b]);
        let codenames: Vec<&str> = union.iter().map(|p| p.codename()).collect();
        assert_eq!(
            codenames,
            vec![
                "acceso_personal",
                "accion_personal_crear",
                "accion_personal_editar"
            ]
        );

        // Order of roles does not matter.
        assert_eq!(union, aggregate_permissions([&b, &a]));
    }

    #[test]
    fn assignment_filter_drops_foreign_and_unknown_ids() {
        let home = StationId::new();
        let other = StationId::new();
        let universal = role("Capitán", None, &[]);
        let local = role("Ayudante", Some(home), &[]);
        let foreign = role("Maquinista", Some(other), &[]);
        let catalog = vec![universal.clone(), local.clone(), foreign.clone()];

        let stray = RoleId::new();
        let accepted = validate_role_assignment(
            home,
            &[foreign.id(), local.id(), stray, universal.id()],
            &catalog,
        );
        assert_eq!(accepted, vec![local.id(), universal.id()]);
    }

    #[test]
    fn assignment_filter_deduplicates_preserving_first_position() {
        let home = StationId::new();
        let a = role("A", None, &[]);
        let b = role("B", None, &[]);
        let catalog = vec![a.clone(), b.clone()];

        let accepted = validate_role_assignment(home, &[a.id(), b.id(), a.id()], &catalog);
        assert_eq!(accepted, vec![a.id(), b.id()]);
    }
}
