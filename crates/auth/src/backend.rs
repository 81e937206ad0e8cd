//! Concrete authentication backend
//!
//! Tokens are self-contained: validating one needs only the signing secret,
//! so the backend holds configuration and no database handle.

use uuid::Uuid;

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::types::UserRole;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Issue a signed token for `user_id` with `role`
    pub fn issue_token(&self, user_id: Uuid, role: UserRole) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id,
            role,
            iat: now.max(0) as u64,
            exp: (now + self.config.token_ttl_secs).max(0) as u64,
        };

        crate::jwt::encode_jwt_token(&claims, &self.config)
    }

    /// Validate a bearer token and build the caller's context
    pub fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;
        Ok(AuthContext::new(claims.user_id, claims.role))
    }
}
