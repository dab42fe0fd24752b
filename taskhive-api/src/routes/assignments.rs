/// Task assignment endpoints
///
/// # Endpoints
///
/// - `POST /tasks/:id/assign` - Assign a user to a task
/// - `DELETE /tasks/:id/assign/:user` - Remove a user from a task
///
/// Assigning requires owner/co_owner/collaborator on project tasks, or being
/// the creator on personal tasks. Self-removal is always allowed, except
/// that the creator of a personal task can never be unassigned from it.
/// The assignee is notified through the dispatcher.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthSession,
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use taskhive_shared::{
    auth::authorization,
    models::{
        assignment::{Assignment, CreateAssignment},
        task::Task,
        user::User,
    },
    notify::NotificationEvent,
};
use uuid::Uuid;

/// Assign user request
#[derive(Debug, Deserialize)]
pub struct AssignUserRequest {
    /// User to assign
    pub user_id: Uuid,
}

/// Assign a user to a task
///
/// The duplicate check and the insert share one transaction so concurrent
/// requests cannot assign the same user twice.
///
/// # Errors
///
/// - `403 Forbidden`: Caller lacks assignment rights on the task
/// - `404 Not Found`: Task doesn't exist
/// - `422 Unprocessable Entity`: Unknown user, or user already assigned
pub async fn assign_user(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<AssignUserRequest>,
) -> ApiResult<Json<ApiResponse<Assignment>>> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::require_assignment_rights(&state.db, session.user.id, &task).await?;

    if !User::exists(&state.db, req.user_id).await? {
        return Err(ApiError::validation("user_id", "User does not exist"));
    }

    let mut tx = state.db.begin().await?;

    if Assignment::exists(&mut *tx, task.id, req.user_id).await? {
        return Err(ApiError::Conflict("User already assigned".to_string()));
    }

    let assignment = Assignment::create(
        &mut *tx,
        CreateAssignment {
            task_id: task.id,
            user_id: req.user_id,
            assigned_by: session.user.id,
        },
    )
    .await?;

    tx.commit().await?;

    // Notify the assignee, fire-and-forget
    state.notifier.dispatch(NotificationEvent::TaskAssigned {
        task_id: task.id,
        task_title: task.title.clone(),
        project_id: task.project_id,
        assigned_by_name: session.user.name.clone(),
        recipient: req.user_id,
    });

    Ok(ApiResponse::ok("User assigned to task", assignment))
}

/// Remove a user from a task's assignee set
///
/// # Errors
///
/// - `403 Forbidden`: Removing someone else without assignment rights, or
///   unassigning the creator of a personal task
/// - `404 Not Found`: Task doesn't exist
pub async fn unassign_user(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path((task_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::require_unassignment_rights(&state.db, session.user.id, &task, user_id).await?;

    Assignment::delete(&state.db, task.id, user_id).await?;

    Ok(ApiResponse::ok(
        "User removed from task",
        serde_json::json!([]),
    ))
}
