//! Common error types and handling for the pickup-point service
//!
//! Every failure carries a stable error code. Business-rule violations and
//! expected absences get their own variants so callers can branch on them;
//! infrastructure failures are wrapped and never leak storage text to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any transaction opens
    Validation,
    /// Business-rule violation
    Conflict,
    /// Recoverable "nothing there" condition the caller is expected to handle
    ExpectedAbsence,
    /// Generic missing record (e.g. unknown user)
    NotFound,
    /// Authentication or authorization failure
    Auth,
    /// Storage, transaction or other internal failure
    Infrastructure,
}

/// Common error type for the pickup-point service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("City '{0}' is not allowed")]
    InvalidCity(String),

    #[error("Product type '{0}' is not allowed")]
    InvalidProductType(String),

    #[error("Role '{0}' is not allowed")]
    InvalidRole(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Open reception already exists")]
    OpenReceptionExists,

    #[error("No open reception for this pickup point")]
    NoOpenReception,

    #[error("No products to delete")]
    NoProductsToDelete,

    #[error("Reception not found")]
    ReceptionNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify the error by taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_)
            | Error::InvalidCity(_)
            | Error::InvalidProductType(_)
            | Error::InvalidRole(_)
            | Error::InvalidEmail(_)
            | Error::WeakPassword(_) => ErrorKind::Validation,
            Error::OpenReceptionExists | Error::UserAlreadyExists => ErrorKind::Conflict,
            Error::NoOpenReception | Error::NoProductsToDelete | Error::ReceptionNotFound => {
                ErrorKind::ExpectedAbsence
            }
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidCredentials | Error::Authentication(_) | Error::Authorization(_) => {
                ErrorKind::Auth
            }
            Error::Unexpected(_) | Error::Database(_) | Error::Internal(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Authorization(_) => StatusCode::FORBIDDEN,
            Error::InvalidCredentials | Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => match self.kind() {
                ErrorKind::Validation | ErrorKind::ExpectedAbsence => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "INVALID_REQUEST",
            Error::InvalidCity(_) => "INVALID_CITY",
            Error::InvalidProductType(_) => "INVALID_PRODUCT_TYPE",
            Error::InvalidRole(_) => "INVALID_ROLE",
            Error::InvalidEmail(_) => "INVALID_EMAIL",
            Error::WeakPassword(_) => "WEAK_PASSWORD",
            Error::OpenReceptionExists => "OPEN_RECEPTION_EXISTS",
            Error::NoOpenReception => "NO_OPEN_RECEPTION",
            Error::NoProductsToDelete => "NO_PRODUCTS_TO_DELETE",
            Error::ReceptionNotFound => "RECEPTION_NOT_FOUND",
            Error::NotFound(_) => "NOT_FOUND",
            Error::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Error::InvalidCredentials => "INVALID_CREDENTIALS",
            Error::Authentication(_) => "UNAUTHORIZED",
            Error::Authorization(_) => "FORBIDDEN",
            Error::Unexpected(_) | Error::Database(_) | Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to API clients
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Infrastructure => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Log internal errors with full context
        if self.kind() == ErrorKind::Infrastructure {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}
