//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! Role gating happens here, before a handler reaches a domain service:
//! a missing or invalid token is 401, a valid token with the wrong role is 403.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;
use crate::types::UserRole;

/// Authenticated caller with any role
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate_jwt(&token)?;

        Ok(AuthUser(auth_context))
    }
}

async fn require_role<S>(
    parts: &mut Parts,
    state: &S,
    allowed: &[UserRole],
) -> Result<AuthContext, AuthError>
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    let AuthUser(auth_context) = AuthUser::from_request_parts(parts, state).await?;

    if !auth_context.has_any_role(allowed) {
        tracing::debug!(
            user_id = %auth_context.user_id,
            role = %auth_context.role,
            "Role not permitted for this operation"
        );
        return Err(AuthError::InsufficientRole);
    }

    Ok(auth_context)
}

/// Caller with the employee role
#[derive(Debug)]
pub struct EmployeeUser(pub AuthContext);

impl<S> FromRequestParts<S> for EmployeeUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        require_role(parts, state, &[UserRole::Employee])
            .await
            .map(EmployeeUser)
    }
}

/// Caller with the moderator role
#[derive(Debug)]
pub struct ModeratorUser(pub AuthContext);

impl<S> FromRequestParts<S> for ModeratorUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        require_role(parts, state, &[UserRole::Moderator])
            .await
            .map(ModeratorUser)
    }
}

/// Caller with the employee or moderator role
#[derive(Debug)]
pub struct StaffUser(pub AuthContext);

impl<S> FromRequestParts<S> for StaffUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        require_role(parts, state, &[UserRole::Employee, UserRole::Moderator])
            .await
            .map(StaffUser)
    }
}
