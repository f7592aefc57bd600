//! PostgreSQL repository implementations of the store traits.

pub mod authorization;
pub mod feature;
pub mod grant;
pub mod role;
pub mod user;

pub use authorization::AuthorizationRepository;
pub use feature::FeatureRepository;
pub use grant::GrantRepository;
pub use role::RoleRepository;
pub use user::UserRepository;

use rolegate_core::error::{AppError, ErrorKind};

/// Map a sqlx error to an `AppError`, keeping constraint violations
/// distinguishable from an unreachable database.
pub(crate) fn map_db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::conflict(format!("{context}: duplicate value"));
            }
            if db.is_foreign_key_violation() {
                return AppError::validation(format!("{context}: referenced row does not exist"));
            }
            if db.is_check_violation() {
                return AppError::validation(format!("{context}: value out of range"));
            }
        }
        AppError::with_source(ErrorKind::UpstreamStoreFailure, context, e)
    }
}
