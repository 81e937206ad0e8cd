//! Authentication for the pickup-point API
//!
//! Issues and validates JWTs carrying a user id and role, and provides axum
//! extractors that gate handlers by role. Extractors work with any state
//! implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod types;

pub use backend::AuthBackend;
pub use claims::Claims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AuthUser, EmployeeUser, ModeratorUser, StaffUser};
pub use types::UserRole;
