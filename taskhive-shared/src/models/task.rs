/// Task model and database operations
///
/// This module provides the Task model. A task either belongs to a project
/// (visible to every project member) or is personal (`project_id` null,
/// visible only to its creator).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID REFERENCES projects(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::task::{Task, CreateTask, TaskStatus, TaskPriority};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Personal task: no project, creator auto-assigned
/// let task = Task::create_with_creator_assigned(&pool, CreateTask {
///     project_id: None,
///     created_by: Uuid::new_v4(),
///     title: "Write launch notes".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     priority: TaskPriority::Medium,
///     due_date: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::assignment::{Assignment, CreateAssignment};

/// Task completion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning project (None ⇒ personal task)
    pub project_id: Option<Uuid>,

    /// User who created the task
    pub created_by: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion state
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date (date only, no time component)
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning project, or None for a personal task
    pub project_id: Option<Uuid>,

    /// Creating user
    pub created_by: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Input for partially updating a task
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<NaiveDate>>,
}

/// A task joined with project and creator names, for listing views
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithRefs {
    pub id: Uuid,
    pub project_id: Option<Uuid>,

    /// Name of the owning project (None for personal tasks)
    pub project_name: Option<String>,

    pub created_by: Uuid,

    /// Creator display name
    pub creator_name: String,

    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard aggregate over a visible task set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskStats {
    /// All visible tasks
    pub total_tasks: i64,

    /// Visible tasks with status `completed`
    pub completed: i64,

    /// Visible tasks with status `pending`
    pub pending: i64,

    /// Visible tasks past their due date and not completed
    pub overdue: i64,
}

impl Task {
    /// Whether this is a personal task (no project)
    pub fn is_personal(&self) -> bool {
        self.project_id.is_none()
    }

    /// Whether this task counts as overdue on the given day
    ///
    /// A task due today is NOT overdue; completed tasks are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && self.status != TaskStatus::Completed,
            None => false,
        }
    }

    /// Creates a task and auto-assigns its creator atomically
    ///
    /// The task row and the creator's assignment row are inserted in a single
    /// transaction, matching the invariant that every task starts with its
    /// creator in the assignee set.
    pub async fn create_with_creator_assigned(
        pool: &PgPool,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = Self::create(&mut *tx, data).await?;

        Assignment::create(
            &mut *tx,
            CreateAssignment {
                task_id: task.id,
                user_id: task.created_by,
                assigned_by: task.created_by,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(task)
    }

    /// Inserts a task row
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, created_by, title, description, status, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, project_id, created_by, title, description, status, priority,
                      due_date, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.created_by)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, created_by, title, description, status, priority,
                   due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID joined with project and creator names
    pub async fn find_with_refs(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<TaskWithRefs>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskWithRefs>(
            r#"
            SELECT t.id, t.project_id, p.name AS project_name,
                   t.created_by, u.name AS creator_name,
                   t.title, t.description, t.status, t.priority, t.due_date,
                   t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN projects p ON p.id = t.project_id
            JOIN users u ON u.id = t.created_by
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Partially updates a task
    ///
    /// Only non-None fields in `data` are written. The `updated_at` timestamp
    /// is always refreshed.
    ///
    /// Returns the updated task if found, None if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, project_id, created_by, title, description, \
             status, priority, due_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Assignments and task comments cascade at the schema level.
    /// Returns true if a task row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks visible to a user, with pagination
    ///
    /// Visible = personal tasks created by the user, plus tasks of projects
    /// the user is a member of (any role). Joined with project and creator
    /// names; ordered by creation date, newest first.
    pub async fn list_visible_for(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskWithRefs>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithRefs>(
            r#"
            SELECT t.id, t.project_id, p.name AS project_name,
                   t.created_by, u.name AS creator_name,
                   t.title, t.description, t.status, t.priority, t.due_date,
                   t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN projects p ON p.id = t.project_id
            JOIN users u ON u.id = t.created_by
            WHERE (t.project_id IS NULL AND t.created_by = $1)
               OR t.project_id IN (SELECT project_id FROM memberships WHERE user_id = $1)
            ORDER BY t.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts tasks visible to a user (same predicate as [`Self::list_visible_for`])
    pub async fn count_visible_for(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM tasks t
            WHERE (t.project_id IS NULL AND t.created_by = $1)
               OR t.project_id IN (SELECT project_id FROM memberships WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Dashboard aggregate over the tasks visible to a user
    ///
    /// Overdue compares against CURRENT_DATE with a strict `<`, so a task due
    /// today does not count.
    pub async fn stats_visible_for(pool: &PgPool, user_id: Uuid) -> Result<TaskStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, TaskStats>(
            r#"
            SELECT COUNT(*) AS total_tasks,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE due_date < CURRENT_DATE AND status != 'completed') AS overdue
            FROM tasks t
            WHERE (t.project_id IS NULL AND t.created_by = $1)
               OR t.project_id IN (SELECT project_id FROM memberships WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Dashboard aggregate over every task (admin view)
    pub async fn stats_all(pool: &PgPool) -> Result<TaskStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, TaskStats>(
            r#"
            SELECT COUNT(*) AS total_tasks,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE due_date < CURRENT_DATE AND status != 'completed') AS overdue
            FROM tasks
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(due_date: Option<NaiveDate>, status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id: None,
            created_by: Uuid::new_v4(),
            title: "Sample".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_and_priority_strings() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");

        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_is_personal() {
        let personal = sample_task(None, TaskStatus::Pending);
        assert!(personal.is_personal());

        let mut project_task = sample_task(None, TaskStatus::Pending);
        project_task.project_id = Some(Uuid::new_v4());
        assert!(!project_task.is_personal());
    }

    #[test]
    fn test_overdue_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();

        // Past due and not completed: overdue
        assert!(sample_task(Some(yesterday), TaskStatus::Pending).is_overdue(today));
        assert!(sample_task(Some(yesterday), TaskStatus::InProgress).is_overdue(today));

        // Due today: NOT overdue
        assert!(!sample_task(Some(today), TaskStatus::Pending).is_overdue(today));

        // Future or absent due date: not overdue
        assert!(!sample_task(Some(tomorrow), TaskStatus::Pending).is_overdue(today));
        assert!(!sample_task(None, TaskStatus::Pending).is_overdue(today));

        // Completed: never overdue
        assert!(!sample_task(Some(yesterday), TaskStatus::Completed).is_overdue(today));
    }

    #[test]
    fn test_update_task_default_is_noop() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.status.is_none());
        assert!(update.priority.is_none());
        assert!(update.due_date.is_none());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
