//! RoleFeature grant model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permission::Action;

/// The four independent CRUD flags of a grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFlags {
    #[serde(default)]
    pub is_add: bool,
    #[serde(default)]
    pub is_view: bool,
    #[serde(default)]
    pub is_edit: bool,
    #[serde(default)]
    pub is_delete: bool,
}

impl PermissionFlags {
    /// All four flags set.
    pub const fn all() -> Self {
        Self {
            is_add: true,
            is_view: true,
            is_edit: true,
            is_delete: true,
        }
    }

    /// Whether the flags allow `action`.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.is_view,
            Action::Add => self.is_add,
            Action::Edit => self.is_edit,
            Action::Delete => self.is_delete,
        }
    }
}

/// A grant row. `(role_id, feature_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoleFeature {
    pub id: Uuid,
    pub role_id: Uuid,
    pub feature_id: Uuid,
    pub is_add: bool,
    pub is_view: bool,
    pub is_edit: bool,
    pub is_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoleFeature {
    /// The grant's flags as a value.
    pub fn flags(&self) -> PermissionFlags {
        PermissionFlags {
            is_add: self.is_add,
            is_view: self.is_view,
            is_edit: self.is_edit,
            is_delete: self.is_delete,
        }
    }

    /// Overwrite the grant's flags.
    pub fn set_flags(&mut self, flags: PermissionFlags) {
        self.is_add = flags.is_add;
        self.is_view = flags.is_view;
        self.is_edit = flags.is_edit;
        self.is_delete = flags.is_delete;
    }
}
