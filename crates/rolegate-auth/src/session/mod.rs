//! Session persistence, the revocation list, and the login/logout/refresh flows.

pub mod manager;
pub mod revocation;
pub mod store;

pub use manager::{LoginOutcome, LoginStage, SessionManager};
pub use revocation::RevocationStore;
pub use store::SessionStore;
