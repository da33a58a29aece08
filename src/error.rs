//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! the failure conditions that can occur, from persistence faults to validation failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly convert
//! application errors into appropriate HTTP responses with JSON bodies. Errors keep
//! their kind as they cross layers; backend detail (`PersistenceFailure`,
//! `CorruptRecord`) is logged server-side and never sent to clients.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific failure kind. These errors are
/// converted into appropriate HTTP responses by the `ResponseError` impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A malformed payload, date, status, or identifier (HTTP 400).
    InvalidInput(String),
    /// Missing, invalid, or expired credentials/token (HTTP 401).
    Unauthorized(String),
    /// A valid token with insufficient role (HTTP 403).
    Forbidden(String),
    /// A requested task or user does not exist (HTTP 404).
    NotFound(String),
    /// A username or email collision on registration (HTTP 409).
    /// Carries the name of the field that collided.
    DuplicateCredential(String),
    /// A storage-level fault (HTTP 500). Detail is logged, not returned.
    PersistenceFailure(String),
    /// A stored record that cannot be reconstructed into a domain entity
    /// (HTTP 500). Detail is logged, not returned.
    CorruptRecord(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DuplicateCredential(field) => write!(f, "{} already exists", field),
            AppError::PersistenceFailure(msg) => write!(f, "Persistence failure: {}", msg),
            AppError::CorruptRecord(msg) => write!(f, "Corrupt record: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON error responses.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InvalidInput(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::DuplicateCredential(field) => HttpResponse::Conflict().json(json!({
                "error": format!("{} already exists", field)
            })),
            // Backend faults are logged with detail and presented generically.
            AppError::PersistenceFailure(msg) => {
                log::error!("persistence failure: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "internal server error"
                }))
            }
            AppError::CorruptRecord(msg) => {
                log::error!("corrupt record: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `AppError::NotFound`, decode faults map to
/// `AppError::CorruptRecord`, and every other database error becomes
/// `AppError::PersistenceFailure`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => AppError::CorruptRecord(error.to_string()),
            _ => AppError::PersistenceFailure(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::InvalidInput`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::InvalidInput(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::PersistenceFailure`.
///
/// Hashing faults are server-side failures and are surfaced generically.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::PersistenceFailure(format!("password hashing failed: {}", error))
    }
}
