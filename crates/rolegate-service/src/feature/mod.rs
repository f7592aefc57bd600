//! Feature reads.

pub mod service;

pub use service::FeatureService;
