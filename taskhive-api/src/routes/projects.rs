/// Project endpoints
///
/// # Endpoints
///
/// - `GET /projects` - List projects the user belongs to
/// - `POST /projects` - Create a project (creator becomes owner)
/// - `GET /projects/:id` - Project details with member list
/// - `DELETE /projects/:id` - Delete a project (owner_id holder only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthSession,
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskhive_shared::{
    auth::authorization,
    models::{
        membership::{MemberDetail, Membership},
        project::{CreateProject, Project, ProjectWithOwner},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Project detail payload: the project plus its member list
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,

    /// Members with their roles
    pub members: Vec<MemberDetail>,
}

/// List projects the authenticated user belongs to
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<ApiResponse<Vec<ProjectWithOwner>>>> {
    let projects = Project::list_for_user(&state.db, session.user.id).await?;

    Ok(ApiResponse::ok("Projects retrieved", projects))
}

/// Create a project
///
/// The creator is stored as `owner_id` and attached with the `owner` pivot
/// role in the same transaction.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Project>>)> {
    req.validate()?;

    let project = Project::create_with_owner(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            owner_id: session.user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, ApiResponse::ok("Project created", project)))
}

/// Show project details with its member list
///
/// Any membership role may view.
pub async fn show_project(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ProjectDetail>>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    authorization::require_project_member(&state.db, project.id, session.user.id).await?;

    let members = Membership::members_of(&state.db, project.id).await?;

    Ok(ApiResponse::ok(
        "Project retrieved",
        ProjectDetail { project, members },
    ))
}

/// Delete a project
///
/// Only the `owner_id` holder may delete; a co-owner's pivot role is not
/// enough. Memberships, tasks, and comments cascade.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    authorization::can_delete_project(session.user.id, &project)?;

    Project::delete(&state.db, project.id).await?;

    Ok(ApiResponse::ok("Project deleted", serde_json::json!([])))
}
