//! User roles

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role assigned to a user at registration. Never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Employee,
    Moderator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Employee => "employee",
            UserRole::Moderator => "moderator",
        }
    }

    /// Roles allowed to read pickup-point listings
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Employee | UserRole::Moderator)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = pickup_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(UserRole::Client),
            "employee" => Ok(UserRole::Employee),
            "moderator" => Ok(UserRole::Moderator),
            _ => Err(pickup_common::Error::InvalidRole(s.to_string())),
        }
    }
}
