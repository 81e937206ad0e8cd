//! User domain: registration, login and dummy login

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

pub use domain::entities::User;
pub use domain::password::{hash_password, verify_password};
pub use domain::validation::{normalize_email, validate_email, validate_password};

pub use repository::{UserRepository, UsersRepositories};
pub use service::{UsersService, DUMMY_USER_ID};

// Re-export API types
pub use api::routes;
pub use api::UsersState;
