/// Project membership endpoints
///
/// # Endpoints
///
/// - `POST /projects/:id/members` - Add a member (owner/co_owner only)
/// - `DELETE /projects/:id/members/:user` - Remove a member (owner/co_owner
///   only; the project owner can never be removed)

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
        membership::{CreateMembership, Membership, ProjectRole},
        project::Project,
        user::User,
    },
};
use uuid::Uuid;

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,

    /// Role to grant; `owner` is never assignable through this endpoint
    pub role: ProjectRole,
}

/// Add a user to a project
///
/// The duplicate check and the insert share one transaction so concurrent
/// requests cannot create two rows for the same user.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not owner/co_owner
/// - `404 Not Found`: Project doesn't exist
/// - `422 Unprocessable Entity`: Unknown user, `owner` role requested, or
///   user already in project
pub async fn add_member(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<ApiResponse<Membership>>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    authorization::require_member_management(&state.db, project.id, session.user.id).await?;

    // The single owner row is created with the project and never granted here
    if req.role == ProjectRole::Owner {
        return Err(ApiError::validation(
            "role",
            "Role must be one of co_owner, collaborator, member",
        ));
    }

    if !User::exists(&state.db, req.user_id).await? {
        return Err(ApiError::validation("user_id", "User does not exist"));
    }

    let mut tx = state.db.begin().await?;

    if Membership::exists(&mut *tx, project.id, req.user_id).await? {
        return Err(ApiError::Conflict("User already in project".to_string()));
    }

    let membership = Membership::create(
        &mut *tx,
        CreateMembership {
            project_id: project.id,
            user_id: req.user_id,
            role: req.role,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(ApiResponse::ok("Member added", membership))
}

/// Remove a user from a project
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not owner/co_owner, or the target is the
///   project owner (denied unconditionally)
/// - `404 Not Found`: Project doesn't exist
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let role = Membership::role_of(&state.db, project.id, session.user.id).await?;
    authorization::can_remove_member(role, &project, user_id)?;

    Membership::delete(&state.db, project.id, user_id).await?;

    Ok(ApiResponse::ok("Member removed", serde_json::json!([])))
}
