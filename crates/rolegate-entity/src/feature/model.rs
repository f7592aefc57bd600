//! Feature entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A navigable screen or menu node. Features form a tree through
/// `parent_menu_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Unique feature identifier.
    pub id: Uuid,
    /// Internal name.
    pub name: String,
    /// Parent menu node, `None` for top-level entries.
    pub parent_menu_id: Option<Uuid>,
    /// Icon identifier for the menu entry.
    pub menu_icon: Option<String>,
    /// Thai display label.
    pub menu_name_th: String,
    /// English display label.
    pub menu_name_en: String,
    /// Route slug, used to look up a grant by screen.
    pub menu_slug: String,
    /// Sort key within the menu.
    pub menu_seq_no: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Feature {
    /// Whether this node sits at the top of the menu tree.
    pub fn is_root(&self) -> bool {
        self.parent_menu_id.is_none()
    }
}
