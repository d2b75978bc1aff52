//! Display grouping of permissions by module.
//!
//! Parents are `acceso_<module>` permissions; each `accion_*` permission
//! attaches to the parent whose module segment prefixes its remainder.
//! Module names may contain underscores, so when modules nest the longest
//! matching module wins.

use tracing::warn;

use crate::permission::{Permission, PermissionKind};

/// One module's worth of permissions for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGroup {
    pub module: String,
    pub label: String,
    pub parent: Permission,
    pub children: Vec<Permission>,
}

/// Group permissions into module sections.
///
/// Orphans (actions without a matching parent, codenames outside the
/// convention) are excluded from the result and logged; a malformed
/// permission set is a display concern, never an error.
pub fn group_by_module<'a, I>(permissions: I) -> Vec<ModuleGroup>
where
    I: IntoIterator<Item = &'a Permission>,
{
    let mut parents: Vec<(&str, &Permission)> = Vec::new();
    let mut actions: Vec<(&str, &Permission)> = Vec::new();

    for permission in permissions {
        match permission.kind() {
            PermissionKind::ModuleAccess { module } => parents.push((module, permission)),
            PermissionKind::ModuleAction { remainder } => actions.push((remainder, permission)),
            PermissionKind::Other => {
                warn!(codename = %permission.codename(), "permission outside taxonomy, excluded from grouping");
            }
        }
    }

    let mut groups: Vec<ModuleGroup> = parents
        .iter()
        .map(|(module, parent)| ModuleGroup {
            module: module.to_string(),
            label: parent.label().to_string(),
            parent: (*parent).clone(),
            children: Vec::new(),
        })
        .collect();

    for (remainder, action) in actions {
        // `<module>_<verb>`: pick the longest known module that prefixes the
        // remainder and leaves a non-empty verb behind.
        let best = groups
            .iter_mut()
            .filter(|group| {
                remainder
                    .strip_prefix(group.module.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .is_some_and(|verb| !verb.is_empty())
            })
            .max_by_key(|group| group.module.len());

        match best {
            Some(group) => group.children.push(action.clone()),
            None => {
                warn!(codename = %action.codename(), "orphan action permission, excluded from grouping");
            }
        }
    }

    for group in &mut groups {
        group.children.sort_by(|a, b| a.label().cmp(b.label()));
    }
    groups.sort_by(|a, b| a.label.cmp(&b.label));
    groups
}
