//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A back-office user.
///
/// A user holds at most one role. The password hash never leaves the
/// process: it is skipped on serialization and comes back empty from
/// the cache.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address, one of the two login identifiers.
    pub email: String,
    /// Phone number, the other login identifier.
    pub phone_number: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Avatar object key.
    pub avatar: Option<String>,
    /// Placeholder, never enforced.
    pub two_factor_enabled: bool,
    /// Assigned role.
    pub role_id: Option<Uuid>,
    /// Deactivated users cannot log in.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl User {
    /// Whether `identifier` should be matched against the email column
    /// rather than the phone number.
    pub fn identifier_is_email(identifier: &str) -> bool {
        identifier.contains('@')
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

/// Partial update applied to a user. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New avatar key.
    pub avatar: Option<String>,
    /// New role assignment.
    pub role_id: Option<Uuid>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.avatar.is_none()
            && self.role_id.is_none()
            && self.is_active.is_none()
    }

    /// Apply the update to an in-memory copy of the row.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            user.phone_number = phone_number.clone();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(role_id) = self.role_id {
            user.role_id = Some(role_id);
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

/// Admin list filters. Every field that is set must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
    /// Substring of the phone number.
    pub phone_number: Option<String>,
    /// Case-insensitive substring of "first last".
    pub full_name: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if self.role_id.is_some_and(|id| user.role_id != Some(id)) {
            return false;
        }
        if self.is_active.is_some_and(|active| user.is_active != active) {
            return false;
        }
        if let Some(phone) = self.phone_number.as_deref().filter(|p| !p.is_empty()) {
            if !user.phone_number.contains(phone) {
                return false;
            }
        }
        if let Some(name) = self.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            let full = format!("{} {}", user.first_name, user.last_name).to_lowercase();
            if !full.contains(&name.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
