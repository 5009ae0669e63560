//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Database Error? ─── DbError::NotFound { .. } ──────┐                   │
//! │         │                                           │                   │
//! │         ▼                                           ▼                   │
//! │  Core Error? ─── CoreError::PromoExpired { .. } ── ApiError ──► caller  │
//! │         │                                           ▲                   │
//! │         ▼                                           │                   │
//! │  Form Error? ─── FieldErrors (one per field) ───────┘                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────► caller  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors serialize with a machine-readable `code`, a human-readable
//! `message` and, for form failures, the per-field messages.

use serde::Serialize;
use storefront_core::{CoreError, FieldErrors};
use storefront_db::DbError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "name is required",
///   "fields": { "errors": [{ "field": "name", "message": "name is required" }] }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages when a form failed validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Nobody is signed in (401)
    Unauthorized,

    /// Signed in without the needed role (403)
    Forbidden,

    /// Database operation failed (500)
    DatabaseError,

    /// Business rule refused the request (422)
    BusinessLogic,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Sign in to continue")
    }

    pub fn forbidden(what: &str) -> Self {
        ApiError::new(ErrorCode::Forbidden, format!("Not allowed to open {}", what))
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::CorruptRow { entity, id, reason } => {
                tracing::error!(entity = %entity, id = %id, "Corrupt row: {}", reason);
                ApiError::new(ErrorCode::DatabaseError, format!("Stored {} is unreadable", entity))
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            e @ (CoreError::PromoInactive { .. }
            | CoreError::PromoExpired { .. }
            | CoreError::SelfMessage) => ApiError::new(ErrorCode::BusinessLogic, e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::InvalidForm(fields) => ApiError::from(fields),
        }
    }
}

/// Form failures keep every field message for inline display.
impl From<FieldErrors> for ApiError {
    fn from(fields: FieldErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: fields.to_string(),
            fields: Some(fields),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;
