/// Dashboard endpoint
///
/// # Endpoint
///
/// ```text
/// GET /dashboard
/// ```
///
/// Returns task counts over the caller's visible task set: personal tasks
/// plus tasks of projects they belong to. Admin accounts see every task.
/// Overdue means due before today and not completed; a task due today does
/// not count.

use crate::{app::AppState, error::ApiResult, middleware::auth::AuthSession, response::ApiResponse};
use axum::{extract::State, Extension, Json};
use taskhive_shared::models::task::{Task, TaskStats};

/// Dashboard handler
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<ApiResponse<TaskStats>>> {
    let stats = if session.user.role.is_admin() {
        Task::stats_all(&state.db).await?
    } else {
        Task::stats_visible_for(&state.db, session.user.id).await?
    };

    Ok(ApiResponse::ok("Dashboard data retrieved", stats))
}
