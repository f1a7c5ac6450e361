//! Static role → permission table.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// Actions a role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    GetDashboard,
    GetUsers,
    ManageUsers,
}

/// Immutable mapping from role to granted permissions, built once at startup.
#[derive(Debug, Clone)]
pub struct RoleRights {
    rights: HashMap<Role, HashSet<Permission>>,
}

impl RoleRights {
    /// Build a table from explicit grants. Roles not listed are granted nothing.
    pub fn new<I, P>(grants: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = Permission>,
    {
        Self {
            rights: grants
                .into_iter()
                .map(|(role, perms)| (role, perms.into_iter().collect()))
                .collect(),
        }
    }

    /// The table the service ships with.
    pub fn standard() -> Self {
        Self::new([
            (Role::User, vec![Permission::GetDashboard]),
            (
                Role::Admin,
                vec![
                    Permission::GetUsers,
                    Permission::ManageUsers,
                    Permission::GetDashboard,
                ],
            ),
        ])
    }

    pub fn allows(&self, role: Role, permission: Permission) -> bool {
        self.rights
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }
}
