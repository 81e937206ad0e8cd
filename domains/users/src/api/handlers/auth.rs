//! Public authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use pickup_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::UsersState;
use crate::domain::entities::User;
use crate::domain::validation::{validate_email, validate_password};

#[derive(Debug, Deserialize, Validate)]
pub struct DummyLoginRequest {
    #[validate(length(min = 1, max = 32))]
    pub role: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 32))]
    pub role: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(max = 255))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue a token for a role without credentials
///
/// **POST /dummyLogin** (public)
pub async fn dummy_login(
    State(state): State<UsersState>,
    ValidatedJson(request): ValidatedJson<DummyLoginRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state.service.dummy_login(&request.role).await?;
    Ok(Json(TokenResponse { token }))
}

/// Register a user
///
/// **POST /register** (public)
pub async fn register(
    State(state): State<UsersState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let user = state
        .service
        .register(&request.email, &request.password, &request.role)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange email and password for a token
///
/// **POST /login** (public)
pub async fn login(
    State(state): State<UsersState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    validate_email(&request.email)?;

    let token = state
        .service
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}
