/// Uniform response envelope
///
/// Every endpoint, success or failure, answers with the same JSON shape:
///
/// ```json
/// {
///   "status": true,
///   "message": "Task created",
///   "data": { ... }
/// }
/// ```
///
/// Error responses set `status: false` and may carry an `errors` array of
/// field-level problems (see `crate::error`).

use axum::Json;
use serde::Serialize;

/// Success envelope wrapping a payload
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always true for success responses
    pub status: bool,

    /// Human-readable outcome description
    pub message: String,

    /// The payload
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Builds a success envelope
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.into(),
            data,
        })
    }
}
