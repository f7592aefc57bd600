//! Row builders for seeding a [`MemoryStore`](super::MemoryStore).

use chrono::Utc;
use uuid::Uuid;

use rolegate_entity::feature::Feature;
use rolegate_entity::grant::{PermissionFlags, RoleFeature};
use rolegate_entity::role::Role;
use rolegate_entity::user::User;

/// An active user with no role. `password` is stored as given.
pub fn user(email: &str, phone_number: &str, password: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        first_name: "Test".into(),
        last_name: "User".into(),
        email: email.into(),
        phone_number: phone_number.into(),
        password: password.into(),
        avatar: None,
        two_factor_enabled: false,
        role_id: None,
        is_active: true,
        created_at: now,
        created_by: None,
        updated_at: now,
        updated_by: None,
        deleted_at: None,
        deleted_by: None,
    }
}

pub fn role(name: &str, level: i32) -> Role {
    let now = Utc::now();
    Role {
        id: Uuid::now_v7(),
        name: name.into(),
        level,
        created_at: now,
        created_by: None,
        updated_at: now,
        updated_by: None,
        deleted_at: None,
        deleted_by: None,
    }
}

/// An active root feature whose name and slug are both `slug`.
pub fn feature(slug: &str, seq: i32) -> Feature {
    let now = Utc::now();
    Feature {
        id: Uuid::now_v7(),
        name: slug.into(),
        parent_menu_id: None,
        menu_icon: None,
        menu_name_th: slug.into(),
        menu_name_en: slug.into(),
        menu_slug: slug.into(),
        menu_seq_no: seq,
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn grant(role_id: Uuid, feature_id: Uuid, flags: PermissionFlags) -> RoleFeature {
    let now = Utc::now();
    let mut grant = RoleFeature {
        id: Uuid::now_v7(),
        role_id,
        feature_id,
        is_add: false,
        is_view: false,
        is_edit: false,
        is_delete: false,
        created_at: now,
        updated_at: now,
    };
    grant.set_flags(flags);
    grant
}
