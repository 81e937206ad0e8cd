//! Shared utilities, configuration, and error handling for the pickup-point service
//!
//! This crate provides:
//! - Configuration management following 12-factor principles
//! - Error types with stable error codes
//! - The transaction manager every repository runs through
//! - Allow-list lookups and shared axum extractors
//! - Prometheus recorder setup and database metrics

pub mod allow_list;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;
pub mod telemetry;

pub use allow_list::AllowList;
pub use db::{AccessMode, Executor, IsolationLevel, TxManager, TxOptions};
pub use error::{Error, ErrorKind, Result};
pub use extractors::{PageParams, ValidatedJson};
pub use state::StateError;
