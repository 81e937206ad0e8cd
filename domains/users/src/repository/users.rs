//! User repository

use pickup_common::db::{is_unique_violation, Executor};
use pickup_common::{Error, Result};

use crate::domain::entities::User;

/// Unique constraint on `users.email`
pub const EMAIL_UNIQUE: &str = "users_email_key";

#[derive(Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    /// Look a user up by normalized email
    pub async fn find_by_email(&self, ex: &Executor, email: &str) -> Result<Option<User>> {
        ex.fetch_optional(
            "find_user_by_email",
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password_hash, role, created_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to find user by email");
            Error::from(e)
        })
    }

    /// Insert a user. A duplicate email is [`Error::UserAlreadyExists`].
    pub async fn create(&self, ex: &Executor, user: &User) -> Result<User> {
        let result = ex
            .fetch_one(
                "create_user",
                sqlx::query_as::<_, User>(
                    r#"
                    INSERT INTO users (id, email, password_hash, role, created_at)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id, email, password_hash, role, created_at
                    "#,
                )
                .bind(user.id)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.role)
                .bind(user.created_at),
            )
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e, EMAIL_UNIQUE) => {
                tracing::warn!("Concurrent registration for the same email");
                Err(Error::UserAlreadyExists)
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %user.id, "Failed to create user");
                Err(e.into())
            }
        }
    }
}
