//! Pickup-point domain: pickup points, receptions, products

pub mod api;
pub mod domain;
pub mod metrics;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::{ReceptionEvent, ReceptionState, ReceptionStateMachine, StateError};
pub use domain::tree::{assemble_pvz_tree, PvzTreeRow};

// Re-export repository types
pub use repository::{ProductRepository, PvzRepositories, PvzRepository, ReceptionRepository};

pub use crate::metrics::PvzMetrics;
pub use service::PvzService;

// Re-export API types
pub use api::routes;
pub use api::PvzState;
