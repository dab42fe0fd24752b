/// Health check endpoint
///
/// Verifies the server is running and the database is reachable.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": true,
///   "message": "API is working",
///   "data": { "version": "0.1.0", "database": "connected" }
/// }
/// ```

use crate::{app::AppState, error::ApiResult, response::ApiResponse};
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<HealthData>>> {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Ok(ApiResponse::ok(
        "API is working",
        HealthData {
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        },
    ))
}
