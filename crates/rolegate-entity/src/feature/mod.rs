//! Feature (menu/screen) entity.

pub mod model;

pub use model::Feature;
