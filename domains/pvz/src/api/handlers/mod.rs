//! HTTP handlers for the pickup-point API

pub mod products;
pub mod pvz;
pub mod receptions;

use pickup_common::{Error, Result};
use uuid::Uuid;

/// Parse a pickup-point ID taken from the request path
pub(crate) fn parse_pvz_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| Error::Validation(format!("Invalid pickup point id: {}", raw)))
}
