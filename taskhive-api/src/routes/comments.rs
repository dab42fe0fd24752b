/// Comment endpoints
///
/// # Endpoints
///
/// - `GET /comments?project_id=&task_id=` - List a project's comments
/// - `POST /comments` - Create a comment
/// - `DELETE /comments/:id` - Delete a comment
///
/// Any project member may comment and read comments. A comment that names a
/// task belonging to a different project is rejected as a validation error
/// before any role check runs. Deleting is open to the author and to
/// owners/co-owners. New comments notify the project's
/// owner/co_owner/collaborator members, excluding the author.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthSession,
    response::ApiResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskhive_shared::{
    auth::authorization,
    models::{
        comment::{Comment, CommentWithAuthor, CreateComment},
        membership::{Membership, ProjectRole},
        project::Project,
        task::Task,
    },
    notify::NotificationEvent,
};
use uuid::Uuid;
use validator::Validate;

/// Comment listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    /// Project whose comments to list (required)
    pub project_id: Option<Uuid>,

    /// Restrict to a single task
    pub task_id: Option<Uuid>,
}

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Project the comment belongs to
    pub project_id: Uuid,

    /// Optional task within the project
    pub task_id: Option<Uuid>,

    /// Comment body
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// List a project's comments, newest first
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Query(query): Query<ListCommentsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<CommentWithAuthor>>>> {
    let project_id = query
        .project_id
        .ok_or_else(|| ApiError::validation("project_id", "Project id is required"))?;

    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    authorization::require_project_member(&state.db, project.id, session.user.id).await?;

    let comments = Comment::list_for_project(&state.db, project.id, query.task_id).await?;

    Ok(ApiResponse::ok("Comments retrieved", comments))
}

/// Create a comment
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a project member
/// - `404 Not Found`: Project or task doesn't exist
/// - `422 Unprocessable Entity`: Empty content, or the task belongs to a
///   different project (checked before any role logic)
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CommentWithAuthor>>)> {
    req.validate()?;

    let project = Project::find_by_id(&state.db, req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    // Task/project consistency is input validation, not authorization
    if let Some(task_id) = req.task_id {
        let task = Task::find_by_id(&state.db, task_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        if task.project_id != Some(project.id) {
            return Err(ApiError::validation(
                "task_id",
                "Task does not belong to this project",
            ));
        }
    }

    authorization::require_project_member(&state.db, project.id, session.user.id).await?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            project_id: project.id,
            task_id: req.task_id,
            user_id: session.user.id,
            content: req.content,
        },
    )
    .await?;

    // Notify owners, co-owners, and collaborators, excluding the author
    let recipients: Vec<Uuid> = Membership::member_ids_with_roles(
        &state.db,
        project.id,
        &[
            ProjectRole::Owner,
            ProjectRole::CoOwner,
            ProjectRole::Collaborator,
        ],
    )
    .await?
    .into_iter()
    .filter(|id| *id != session.user.id)
    .collect();

    state.notifier.dispatch(NotificationEvent::CommentCreated {
        comment: comment.clone(),
        author_name: session.user.name.clone(),
        recipients,
    });

    let data = CommentWithAuthor {
        id: comment.id,
        project_id: comment.project_id,
        task_id: comment.task_id,
        user_id: comment.user_id,
        author_name: session.user.name.clone(),
        content: comment.content,
        created_at: comment.created_at,
    };

    Ok((StatusCode::CREATED, ApiResponse::ok("Comment created", data)))
}

/// Delete a comment
///
/// The author may delete their own comment; owners and co-owners may delete
/// anyone's.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(comment_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let comment = Comment::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    let role = Membership::role_of(&state.db, comment.project_id, session.user.id).await?;
    authorization::can_delete_comment(session.user.id, &comment, role)?;

    Comment::delete(&state.db, comment.id).await?;

    Ok(ApiResponse::ok("Comment deleted", serde_json::json!([])))
}
