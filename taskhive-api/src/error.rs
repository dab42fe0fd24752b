/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts automatically
/// into the response envelope with `status: false`.
///
/// # Taxonomy
///
/// - `Unauthorized` (401): missing/invalid credentials or token
/// - `Forbidden` (403): an authorization rule denied the action
/// - `NotFound` (404): a referenced entity does not exist
/// - `Conflict` (422): duplicate membership/assignment
/// - `ValidationError` (422): malformed or missing input, with field errors
/// - `InternalError` (500): unexpected failure, details logged and masked
///
/// None of these are retried and none are fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use taskhive_shared::auth::{authorization::AuthzError, password::PasswordError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (422) - e.g., duplicate membership or assignment
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<FieldError>),

    /// Internal server error (500)
    InternalError(String),
}

/// A single field-level validation problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response envelope (`status` is always false)
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: bool,

    /// Human-readable error message
    pub message: String,

    /// Empty payload to keep the envelope shape uniform
    pub data: JsonValue,

    /// Field-level validation errors, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Shorthand for a single-field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![FieldError::new(field, message)])
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            status: false,
            message,
            data: JsonValue::Null,
            errors,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Surface constraint violations as conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("users_email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    if constraint.contains("memberships") {
                        return ApiError::Conflict("User already in project".to_string());
                    }
                    if constraint.contains("task_assignments") {
                        return ApiError::Conflict("User already assigned".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert authorization denials to API errors
///
/// Every denial reason maps to 403 with its own message, except lookup
/// failures which stay internal.
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::DatabaseError(e) => ApiError::InternalError(format!("Database error: {}", e)),
            other => ApiError::Forbidden(other.to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert validator output to the field-error list
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Forbidden("Unauthorized project access".to_string());
        assert_eq!(err.to_string(), "Forbidden: Unauthorized project access");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ApiError::ValidationError(vec![
            FieldError::new("email", "Invalid email format"),
            FieldError::new("password", "Password too short"),
        ]);

        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_authz_denials_map_to_forbidden() {
        let err: ApiError = AuthzError::NotProjectMember.into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = AuthzError::CannotRemoveOwner.into();
        match err {
            ApiError::Forbidden(msg) => assert!(msg.contains("owner")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ErrorResponse {
            status: false,
            message: "Request validation failed".to_string(),
            data: JsonValue::Null,
            errors: Some(vec![FieldError::new("title", "required")]),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["status"], false);
        assert!(value["data"].is_null());
        assert_eq!(value["errors"][0]["field"], "title");

        // errors is omitted entirely when absent
        let body = ErrorResponse {
            status: false,
            message: "Not found".to_string(),
            data: JsonValue::Null,
            errors: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("errors").is_none());
    }
}
