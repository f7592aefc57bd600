//! Role entity.

pub mod model;

pub use model::{GrantChange, Role, RoleSummary, UpdateRole};
