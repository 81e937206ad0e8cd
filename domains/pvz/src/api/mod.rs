//! API layer for the pickup-point domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::PvzState;
pub use routes::routes;
