//! Authorization (session) record.

pub mod model;

pub use model::Authorization;
