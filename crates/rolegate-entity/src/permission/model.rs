//! Permission DTOs produced by the resolver.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feature::Feature;
use crate::grant::{PermissionFlags, RoleFeature};
use crate::role::Role;
use crate::user::User;

/// A feature's display metadata merged with the flags of the grant that
/// attaches it to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePermission {
    pub feature_id: Uuid,
    pub name: String,
    pub parent_menu_id: Option<Uuid>,
    pub menu_icon: Option<String>,
    pub menu_name_th: String,
    pub menu_name_en: String,
    pub menu_slug: String,
    pub menu_seq_no: i32,
    pub is_active: bool,
    #[serde(flatten)]
    pub flags: PermissionFlags,
}

impl FeaturePermission {
    /// Merge a feature with its grant. The caller guarantees the grant
    /// belongs to this feature.
    pub fn merge(feature: &Feature, grant: &RoleFeature) -> Self {
        Self {
            feature_id: feature.id,
            name: feature.name.clone(),
            parent_menu_id: feature.parent_menu_id,
            menu_icon: feature.menu_icon.clone(),
            menu_name_th: feature.menu_name_th.clone(),
            menu_name_en: feature.menu_name_en.clone(),
            menu_slug: feature.menu_slug.clone(),
            menu_seq_no: feature.menu_seq_no,
            is_active: feature.is_active,
            flags: grant.flags(),
        }
    }
}

/// A role together with its resolved, ordered permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub role: Role,
    pub permissions: Vec<FeaturePermission>,
}

/// The user object returned by login and the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub avatar: Option<String>,
    pub role_id: Option<Uuid>,
    pub role_name: Option<String>,
    pub role_level: Option<i32>,
    pub two_factor_enabled: bool,
    /// Resolved permissions, ordered by menu sequence.
    pub permissions: Vec<FeaturePermission>,
}

impl UserProfile {
    /// Build a profile from a user and their resolved role, if any.
    pub fn new(user: &User, resolved: Option<RolePermissions>) -> Self {
        let (role, permissions) = match resolved {
            Some(resolved) => (Some(resolved.role), resolved.permissions),
            None => (None, Vec::new()),
        };

        Self {
            user_id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            avatar: user.avatar.clone(),
            role_id: role.as_ref().map(|r| r.id),
            role_name: role.as_ref().map(|r| r.name.clone()),
            role_level: role.as_ref().map(|r| r.level),
            two_factor_enabled: user.two_factor_enabled,
            permissions,
        }
    }

    /// Find the permission entry for a menu slug.
    pub fn permission_for(&self, menu_slug: &str) -> Option<&FeaturePermission> {
        self.permissions.iter().find(|p| p.menu_slug == menu_slug)
    }
}
