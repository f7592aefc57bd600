//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use rolegate_core::error::AppError;

use crate::grant::PermissionFlags;

/// A named role with a privilege level.
///
/// Features are attached to a role through `role_features` grant rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Privilege level, 0 to 100. Higher is more privileged.
    pub level: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl Role {
    /// Lowest allowed level.
    pub const MIN_LEVEL: i32 = 0;
    /// Highest allowed level.
    pub const MAX_LEVEL: i32 = 100;

    /// Reject levels outside `MIN_LEVEL..=MAX_LEVEL`.
    pub fn check_level(level: i32) -> Result<(), AppError> {
        if (Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&level) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Role level must be between {} and {}, got {level}",
                Self::MIN_LEVEL,
                Self::MAX_LEVEL
            )))
        }
    }
}

/// One row of the role list: a role and how many users hold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub role_id: Uuid,
    pub role_name: String,
    pub role_level: i32,
    /// Active users assigned to the role.
    pub number_user: i64,
}

/// Grant flags to write for one feature of a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantChange {
    /// Target feature.
    pub feature_id: Uuid,
    /// New flags. Attaches the feature if the role had no grant for it.
    #[serde(flatten)]
    pub flags: PermissionFlags,
}

/// Update applied to a role and its grants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    /// New unique name.
    pub name: Option<String>,
    /// New level.
    pub level: Option<i32>,
    /// Grants to insert or overwrite.
    #[serde(default)]
    pub grants: Vec<GrantChange>,
}

impl UpdateRole {
    /// Validate the name and level before touching the store.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Role name must not be empty"));
            }
        }
        if let Some(level) = self.level {
            Role::check_level(level)?;
        }
        Ok(())
    }
}
