//! # rolegate-auth
//!
//! Credential verification and the token lifecycle for Rolegate.
//!
//! ## Modules
//!
//! - `jwt`: RS256 token issuing and validation
//! - `password`: Argon2id password hashing and the new-password policy
//! - `permission`: role and grant merging into per-feature permissions
//! - `session`: the session row, the revocation list, and the
//!   login/logout/refresh flows built on them

pub mod jwt;
pub mod password;
pub mod permission;
pub mod session;

#[cfg(test)]
mod testing;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use password::{PasswordHasher, PasswordPolicy};
pub use permission::PermissionResolver;
pub use session::{LoginOutcome, RevocationStore, SessionManager, SessionStore};
