/// Comment model and database operations
///
/// Comments always belong to a project and optionally to one of its tasks.
/// The task/project consistency rule (a comment's task must belong to the
/// comment's project) is enforced at the service layer as a validation
/// error, before any role check runs.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     task_id UUID REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Project the comment belongs to
    pub project_id: Uuid,

    /// Optional task within the project
    pub task_id: Option<Uuid>,

    /// Comment author
    pub user_id: Uuid,

    /// Comment body
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub project_id: Uuid,
    pub task_id: Option<Uuid>,
    pub user_id: Uuid,
    pub content: String,
}

/// A comment joined with its author's name, for listing views
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub project_id: Uuid,
    pub task_id: Option<Uuid>,
    pub user_id: Uuid,

    /// Author display name
    pub author_name: String,

    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (project_id, task_id, user_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, project_id, task_id, user_id, content, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, project_id, task_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Deletes a comment by ID
    ///
    /// Returns true if a comment row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a project's comments, newest first, optionally scoped to a task
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
        task_id: Option<Uuid>,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.project_id, c.task_id, c.user_id,
                   u.name AS author_name,
                   c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.project_id = $1
              AND ($2::uuid IS NULL OR c.task_id = $2)
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(project_id)
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
