//! Route definitions for the user API

use axum::{routing::post, Router};

use super::handlers::auth;
use super::middleware::UsersState;

/// Create all user domain API routes
pub fn routes() -> Router<UsersState> {
    Router::new()
        .route("/dummyLogin", post(auth::dummy_login))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}
