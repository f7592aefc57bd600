//! Password hashing and the policy for new passwords.

pub mod hasher;
pub mod policy;

pub use hasher::PasswordHasher;
pub use policy::PasswordPolicy;
