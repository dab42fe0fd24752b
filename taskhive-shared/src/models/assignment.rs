/// Assignment pivot between tasks and users
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_assignments (
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (task_id, user_id)
/// );
/// ```
///
/// A task has zero or more assignees; the creator is auto-assigned when the
/// task is created (see `Task::create_with_creator_assigned`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::user::UserRef;

/// Assignment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    /// Task ID
    pub task_id: Uuid,

    /// Assigned user ID
    pub user_id: Uuid,

    /// User who made the assignment
    pub assigned_by: Uuid,

    /// When the assignment was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignment {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub assigned_by: Uuid,
}

/// An assignee row carrying its task ID, for stitching assignee lists onto
/// a page of tasks in one query
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AssigneeRow {
    pub task_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

impl Assignment {
    /// Creates an assignment
    ///
    /// Accepts any executor so the duplicate check and the insert can share
    /// one transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreateAssignment,
    ) -> Result<Self, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO task_assignments (task_id, user_id, assigned_by)
            VALUES ($1, $2, $3)
            RETURNING task_id, user_id, assigned_by, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.assigned_by)
        .fetch_one(executor)
        .await?;

        Ok(assignment)
    }

    /// Checks if a user is assigned to a task
    pub async fn exists<'e>(
        executor: impl PgExecutor<'e>,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM task_assignments
                WHERE task_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Removes a user from a task
    ///
    /// Returns true if an assignment row was deleted.
    pub async fn delete<'e>(
        executor: impl PgExecutor<'e>,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM task_assignments WHERE task_id = $1 AND user_id = $2")
                .bind(task_id)
                .bind(user_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the assignees of a single task
    pub async fn assignees_of(pool: &PgPool, task_id: Uuid) -> Result<Vec<UserRef>, sqlx::Error> {
        let assignees = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT u.id, u.name
            FROM task_assignments ta
            JOIN users u ON u.id = ta.user_id
            WHERE ta.task_id = $1
            ORDER BY ta.created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(assignees)
    }

    /// Lists assignees for a set of tasks in one round trip
    pub async fn assignees_for_tasks(
        pool: &PgPool,
        task_ids: &[Uuid],
    ) -> Result<Vec<AssigneeRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AssigneeRow>(
            r#"
            SELECT ta.task_id, u.id, u.name
            FROM task_assignments ta
            JOIN users u ON u.id = ta.user_id
            WHERE ta.task_id = ANY($1)
            ORDER BY ta.created_at ASC
            "#,
        )
        .bind(task_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
