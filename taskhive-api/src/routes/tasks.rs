/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks` - Paginated list of tasks visible to the user
/// - `POST /tasks` - Create a task (personal, or in a project with rights)
/// - `GET /tasks/:id` - Task details with assignees
/// - `PUT /tasks/:id` - Partial update
/// - `DELETE /tasks/:id` - Delete
///
/// Visibility: personal tasks belong solely to their creator; project tasks
/// are open to every project member. Creating a task inside a project
/// requires owner/co_owner/collaborator, and the creator is auto-assigned.

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
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use taskhive_shared::{
    auth::authorization,
    models::{
        assignment::Assignment,
        project::Project,
        task::{CreateTask, Task, TaskPriority, TaskStatus, TaskWithRefs, UpdateTask},
        user::UserRef,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Default page size for task listings
const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound on client-requested page size
const MAX_PER_PAGE: i64 = 100;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,

    /// Page size (default 10, max 100)
    pub per_page: Option<i64>,
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Owning project; omit for a personal task
    pub project_id: Option<Uuid>,

    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (default pending)
    pub status: Option<TaskStatus>,

    /// Priority (default medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date (YYYY-MM-DD)
    pub due_date: Option<NaiveDate>,
}

/// Update task request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<NaiveDate>,
}

/// A task with its related names and assignee list
#[derive(Debug, Serialize)]
pub struct TaskItem {
    #[serde(flatten)]
    pub task: TaskWithRefs,

    /// Assigned users (id, name)
    pub assignees: Vec<UserRef>,
}

/// Paginated task list payload
#[derive(Debug, Serialize)]
pub struct TaskPage {
    pub tasks: Vec<TaskItem>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List tasks visible to the authenticated user, paginated
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ApiResponse<TaskPage>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let offset = (page - 1) * per_page;

    let tasks = Task::list_visible_for(&state.db, session.user.id, per_page, offset).await?;
    let total = Task::count_visible_for(&state.db, session.user.id).await?;

    // Stitch assignees onto the page in one round trip
    let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
    let mut assignees_by_task: HashMap<Uuid, Vec<UserRef>> = HashMap::new();
    for row in Assignment::assignees_for_tasks(&state.db, &task_ids).await? {
        assignees_by_task
            .entry(row.task_id)
            .or_default()
            .push(UserRef {
                id: row.id,
                name: row.name,
            });
    }

    let tasks = tasks
        .into_iter()
        .map(|task| {
            let assignees = assignees_by_task.remove(&task.id).unwrap_or_default();
            TaskItem { task, assignees }
        })
        .collect();

    Ok(ApiResponse::ok(
        "Tasks retrieved",
        TaskPage {
            tasks,
            total,
            page,
            per_page,
        },
    ))
}

/// Create a task
///
/// A `project_id` makes this a project task and requires
/// owner/co_owner/collaborator rights in that project; omitting it creates a
/// personal task. The creator is auto-assigned in the same transaction.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TaskItem>>)> {
    req.validate()?;

    if let Some(project_id) = req.project_id {
        Project::find_by_id(&state.db, project_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

        authorization::require_task_create(&state.db, project_id, session.user.id).await?;
    }

    let task = Task::create_with_creator_assigned(
        &state.db,
        CreateTask {
            project_id: req.project_id,
            created_by: session.user.id,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or(TaskStatus::Pending),
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            due_date: req.due_date,
        },
    )
    .await?;

    let item = load_task_item(&state, task.id).await?;

    Ok((StatusCode::CREATED, ApiResponse::ok("Task created", item)))
}

/// Show a single task with assignees
pub async fn show_task(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<TaskItem>>> {
    let task = find_task(&state, task_id).await?;

    authorization::require_task_access(&state.db, session.user.id, &task).await?;

    let item = load_task_item(&state, task.id).await?;

    Ok(ApiResponse::ok("Task retrieved", item))
}

/// Partially update a task
///
/// Same access rule as viewing: creator for personal tasks, any member for
/// project tasks.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<ApiResponse<TaskItem>>> {
    req.validate()?;

    let task = find_task(&state, task_id).await?;

    authorization::require_task_access(&state.db, session.user.id, &task).await?;

    Task::update(
        &state.db,
        task.id,
        UpdateTask {
            title: req.title,
            description: req.description.map(Some),
            status: req.status,
            priority: req.priority,
            due_date: req.due_date.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let item = load_task_item(&state, task.id).await?;

    Ok(ApiResponse::ok("Task updated", item))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let task = find_task(&state, task_id).await?;

    authorization::require_task_access(&state.db, session.user.id, &task).await?;

    Task::delete(&state.db, task.id).await?;

    Ok(ApiResponse::ok("Task deleted", serde_json::json!([])))
}

async fn find_task(state: &AppState, task_id: Uuid) -> Result<Task, ApiError> {
    Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

async fn load_task_item(state: &AppState, task_id: Uuid) -> Result<TaskItem, ApiError> {
    let task = Task::find_with_refs(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let assignees = Assignment::assignees_of(&state.db, task_id).await?;

    Ok(TaskItem { task, assignees })
}
