//! Error types for Shelfmark server

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Machine-readable error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 3,
    NoSuchData = 5,
    AlreadyLoaned = 7,
    ConstraintViolation = 9,
    BadValue = 18,
}

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for a single offending field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            for error in list {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                fields.add(field.to_string(), message);
            }
        }
        fields
    }
}

/// Field a JSON body rejection points at, `body` when it names none.
///
/// `detail` is the deserializer message, prefixed with the field path when the
/// error is below the root (`title: invalid type: ...`).
fn rejected_field(detail: &str) -> (String, String) {
    if let Some((path, message)) = detail.split_once(": ") {
        if !path.is_empty() && !path.contains(char::is_whitespace) {
            return (path.to_string(), message.to_string());
        }
    }
    if let Some((name, _)) = detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
    {
        return (name.to_string(), detail.to_string());
    }
    ("body".to_string(), detail.to_string())
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let is_fk_violation = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);

        if is_fk_violation {
            AppError::Constraint(err.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        let detail = text
            .split_once("target type: ")
            .map(|(_, detail)| detail)
            .unwrap_or(&text);
        let (field, message) = rejected_field(detail);
        tracing::warn!("Rejected request body: {}", text);
        AppError::Validation(FieldErrors::single(field, message))
    }
}

/// Error response body
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Offending fields, present on validation errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg),
            AppError::Validation(errors) => {
                let message = format!("Invalid input: {}", errors);
                fields = Some(errors);
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BadValue, message)
            }
            AppError::Constraint(msg) => {
                tracing::error!("Constraint violation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ConstraintViolation,
                    "The request could not be completed".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::AlreadyLoaned, msg),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
