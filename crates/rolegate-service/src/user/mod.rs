//! User reads and administrative updates.

pub mod service;

pub use service::UserService;
