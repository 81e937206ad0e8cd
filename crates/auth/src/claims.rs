//! JWT claims types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserRole;

/// Claims carried by tokens this service issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub role: UserRole,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}
