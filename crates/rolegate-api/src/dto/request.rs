//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rolegate_core::types::{DEFAULT_PAGE_SIZE, PageRequest};
use rolegate_entity::grant::PermissionFlags;
use rolegate_entity::role::{GrantChange, UpdateRole};
use rolegate_entity::user::{UpdateUser, UserFilter};

/// Login request body. `identifier` is an email or a phone number.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Partial user update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub phone_number: Option<String>,
    #[validate(url)]
    pub avatar: Option<String>,
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            avatar: req.avatar,
            role_id: req.role_id,
            is_active: req.is_active,
        }
    }
}

/// Password change body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
    #[validate(length(min = 1, message = "Password confirmation is required"))]
    pub confirm_new_password: String,
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl UserListQuery {
    /// Split into the page to cut and the filter to apply.
    pub fn into_parts(self) -> (UserFilter, PageRequest) {
        let page = PageRequest::new(self.page, self.size);
        let filter = UserFilter {
            role_id: self.role_id,
            is_active: self.is_active,
            phone_number: self.phone_number,
            full_name: self.full_name,
        };
        (filter, page)
    }
}

/// Role update: name, level, and grant flags per feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub level: Option<i32>,
    #[serde(default)]
    pub grants: Vec<GrantChange>,
}

impl From<UpdateRoleRequest> for UpdateRole {
    fn from(req: UpdateRoleRequest) -> Self {
        Self {
            name: req.name,
            level: req.level,
            grants: req.grants,
        }
    }
}

/// New flags for one role/feature grant. Omitted flags are cleared.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleFeatureRequest {
    #[serde(default)]
    pub is_add: bool,
    #[serde(default)]
    pub is_view: bool,
    #[serde(default)]
    pub is_edit: bool,
    #[serde(default)]
    pub is_delete: bool,
}

impl From<UpdateRoleFeatureRequest> for PermissionFlags {
    fn from(req: UpdateRoleFeatureRequest) -> Self {
        Self {
            is_add: req.is_add,
            is_view: req.is_view,
            is_edit: req.is_edit,
            is_delete: req.is_delete,
        }
    }
}
