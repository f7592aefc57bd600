//! Shared value types.

pub mod pagination;

pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PageResponse};
