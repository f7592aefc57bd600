//! In-process credential store and row builders for seeding it.

pub mod fixtures;
pub mod store;

pub use store::MemoryStore;
