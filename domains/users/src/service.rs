//! User domain service
//!
//! Registration runs the existence check and the insert in one read-write
//! transaction. The unique email constraint backs that check up when two
//! registrations for the same address race.

use std::sync::Arc;

use pickup_auth::{AuthBackend, UserRole};
use pickup_common::{AllowList, Error, ErrorKind, Result, TxOptions};
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::password::{hash_password, verify_password};
use crate::domain::validation::normalize_email;
use crate::repository::UsersRepositories;

/// Subject of every token issued by dummy login
pub const DUMMY_USER_ID: Uuid = Uuid::from_u128(0x00000000_0000_4000_8000_000000000001);

fn log_failure(operation: &'static str, err: &Error) {
    match err.kind() {
        ErrorKind::Infrastructure => tracing::error!(operation, error = %err, "Operation failed"),
        _ => tracing::warn!(operation, code = err.error_code(), "Operation rejected"),
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Internal(format!("password task failed: {}", e)))?
}

#[derive(Clone)]
pub struct UsersService {
    repos: UsersRepositories,
    roles: Arc<AllowList>,
    auth: AuthBackend,
}

impl UsersService {
    pub fn new(repos: UsersRepositories, roles: Arc<AllowList>, auth: AuthBackend) -> Self {
        Self { repos, roles, auth }
    }

    pub fn repos(&self) -> &UsersRepositories {
        &self.repos
    }

    /// Resolve `role` through the allow-list
    fn parse_role(&self, role: &str) -> Result<UserRole> {
        self.roles
            .canonical(role)
            .ok_or_else(|| Error::InvalidRole(role.to_string()))?
            .parse()
    }

    fn issue_token(&self, user_id: Uuid, role: UserRole) -> Result<String> {
        Ok(self.auth.issue_token(user_id, role)?)
    }

    /// Register a user with an allowed role
    pub async fn register(&self, email: &str, password: &str, role: &str) -> Result<User> {
        let role = self
            .parse_role(role)
            .inspect_err(|e| log_failure("register", e))?;
        let email = normalize_email(email);
        let password = password.to_string();
        let users = &self.repos.users;

        // Hashed before the transaction; a concurrent duplicate still fails
        // on the unique email constraint.
        let password_hash = run_blocking(move || hash_password(&password))
            .await
            .inspect_err(|e| log_failure("register", e))?;

        let user = self
            .repos
            .tx()
            .with_tx(TxOptions::read_write(), |ex| async move {
                if users.find_by_email(&ex, &email).await?.is_some() {
                    return Err(Error::UserAlreadyExists);
                }
                users.create(&ex, &User::new(email, password_hash, role)).await
            })
            .await
            .inspect_err(|e| log_failure("register", e))?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let email = normalize_email(email);

        let user = self
            .repos
            .users
            .find_by_email(&self.repos.executor(), &email)
            .await
            .and_then(|user| user.ok_or(Error::InvalidCredentials))
            .inspect_err(|e| log_failure("login", e))?;

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches = run_blocking(move || verify_password(&password, &stored_hash))
            .await
            .inspect_err(|e| log_failure("login", e))?;
        if !matches {
            let err = Error::InvalidCredentials;
            log_failure("login", &err);
            return Err(err);
        }

        let token = self
            .issue_token(user.id, user.role)
            .inspect_err(|e| log_failure("login", e))?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    /// Issue a token for the placeholder user with an allowed role
    pub async fn dummy_login(&self, role: &str) -> Result<String> {
        let role = self
            .parse_role(role)
            .inspect_err(|e| log_failure("dummy_login", e))?;

        let token = self
            .issue_token(DUMMY_USER_ID, role)
            .inspect_err(|e| log_failure("dummy_login", e))?;
        tracing::debug!(role = %role, "Dummy token issued");
        Ok(token)
    }
}
