//! Permission codenames and their structural convention.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Prefix of module-access (parent) permissions.
pub const ACCESS_PREFIX: &str = "acceso_";

/// Prefix of fine-grained action (child) permissions.
pub const ACTION_PREFIX: &str = "accion_";

/// Build the module-access codename for a module (`"acceso_<module>"`).
pub fn access_codename(module: &str) -> String {
    format!("{ACCESS_PREFIX}{module}")
}

/// A single grantable capability.
///
/// The codename is opaque to enforcement: checks compare whole codenames,
/// never parse them. The structural convention below only drives display
/// grouping ([`crate::taxonomy`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    codename: Cow<'static, str>,
    label: String,
}

impl Permission {
    pub fn new(codename: impl Into<Cow<'static, str>>, label: impl Into<String>) -> Self {
        Self {
            codename: codename.into(),
            label: label.into(),
        }
    }

    pub fn codename(&self) -> &str {
        &self.codename
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Classify the codename by the naming convention.
    pub fn kind(&self) -> PermissionKind<'_> {
        if let Some(module) = self.codename.strip_prefix(ACCESS_PREFIX) {
            if !module.is_empty() {
                return PermissionKind::ModuleAccess { module };
            }
        }
        if let Some(remainder) = self.codename.strip_prefix(ACTION_PREFIX) {
            if !remainder.is_empty() {
                return PermissionKind::ModuleAction { remainder };
            }
        }
        PermissionKind::Other
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.codename)
    }
}

/// Structural classification of a permission codename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind<'a> {
    /// `acceso_<module>`: grants module visibility, parents a display group.
    ModuleAccess { module: &'a str },
    /// `accion_<module>_<verb>`: the module segment is resolved against the
    /// known parents at grouping time, since module names may themselves
    /// contain underscores.
    ModuleAction { remainder: &'a str },
    /// Anything else; excluded from grouping.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_parent_and_child() {
        let parent = Permission::new("acceso_operaciones", "Acceso a Operaciones");
        assert_eq!(
            parent.kind(),
            PermissionKind::ModuleAccess {
                module: "operaciones"
            }
        );

        let child = Permission::new("accion_operaciones_crear", "Crear operación");
        assert_eq!(
            child.kind(),
            PermissionKind::ModuleAction {
                remainder: "operaciones_crear"
            }
        );
    }

    #[test]
    fn bare_prefixes_and_unrelated_codenames_are_other() {
        assert_eq!(Permission::new("acceso_", "x").kind(), PermissionKind::Other);
        assert_eq!(Permission::new("accion_", "x").kind(), PermissionKind::Other);
        assert_eq!(
            Permission::new("ver_reportes", "Ver reportes").kind(),
            PermissionKind::Other
        );
    }

    #[test]
    fn access_codename_builds_the_parent_name() {
        assert_eq!(access_codename("personal"), "acceso_personal");
    }
}
