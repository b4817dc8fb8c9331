use actix_web::{HttpResponse, ResponseError};
use rusqlite::Error as SqliteError;
use thiserror::Error;

use crate::domain::animal::validation::ValidationErrors;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "An animal with this email already exists.";
pub const NOT_FOUND_MESSAGE: &str = "Animal not found.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Failures raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Invalid database path: {0}")]
    InvalidDatabasePath(String),

    #[error(transparent)]
    Sqlite(SqliteError),
}

impl From<SqliteError> for StoreError {
    fn from(error: SqliteError) -> Self {
        match &error {
            SqliteError::SqliteFailure(failure, message)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::UniqueViolation(message.clone().unwrap_or_else(|| failure.to_string()))
            }
            _ => StoreError::Sqlite(error),
        }
    }
}

/// Outcome of a registry operation that did not succeed.
///
/// `Display` is the message shown to end users; infrastructure details are
/// logged where the failure is caught and never reach this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("An animal with this email already exists.")]
    DuplicateEmail,

    #[error("Animal not found.")]
    NotFound,

    #[error("An internal error occurred. Please try again later.")]
    Internal,
}

impl ServiceError {
    /// Form field the error belongs to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ServiceError::DuplicateEmail => Some("email"),
            _ => None,
        }
    }
}

/// Errors surfaced by the JSON endpoints.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Template error: {0}")]
    Template(String),
}

/// Internal failures become a 500; anything the caller got wrong
/// (unknown id, invalid input, duplicate email) is a 400.
impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Internal => ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(error: minijinja::Error) -> Self {
        ApiError::Template(error.to_string())
    }
}

impl ApiError {
    /// Message safe to show to end users.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::InternalServerError(_) | ApiError::Template(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({
            "status": "error",
            "message": self.public_message()
        });

        match self {
            ApiError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            ApiError::InternalServerError(_) | ApiError::Template(_) => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

// ----------------------------- TESTS --------------------------------
