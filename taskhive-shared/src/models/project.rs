/// Project model and database operations
///
/// This module provides the Project model. A project is created by a user who
/// becomes its immutable owner (`owner_id`); all other access flows through
/// the membership pivot.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Invariants
///
/// - The `owner_id` holder always has the `owner` pivot role, created in the
///   same transaction as the project row ([`Project::create_with_owner`]).
/// - Deleting a project cascades to memberships, tasks, and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::membership::{CreateMembership, Membership, ProjectRole};

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// The immutable creator/owner (distinct from, but always holding, the
    /// `owner` pivot role)
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// The creating user, stored as `owner_id`
    pub owner_id: Uuid,
}

/// A project joined with its owner's user record, for listing views
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectWithOwner {
    /// Project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owner user ID
    pub owner_id: Uuid,

    /// Owner display name
    pub owner_name: String,

    /// Owner email
    pub owner_email: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project and its owner membership atomically
    ///
    /// The project row and the owner's `owner`-role pivot row are inserted in
    /// a single transaction, so no observer can ever see a project without
    /// exactly one owner member.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or the transaction cannot commit.
    pub async fn create_with_owner(
        pool: &PgPool,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        Membership::create(
            &mut *tx,
            CreateMembership {
                project_id: project.id,
                user_id: project.owner_id,
                role: ProjectRole::Owner,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    /// Lists all projects a user belongs to, joined with the owner record
    ///
    /// Ordered by creation date, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ProjectWithOwner>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectWithOwner>(
            r#"
            SELECT p.id, p.name, p.description, p.owner_id,
                   o.name AS owner_name, o.email AS owner_email,
                   p.created_at
            FROM projects p
            JOIN memberships m ON m.project_id = p.id
            JOIN users o ON o.id = p.owner_id
            WHERE m.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Deletes a project by ID
    ///
    /// Memberships, tasks, and comments cascade at the schema level.
    /// Returns true if a project row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_struct() {
        let owner_id = Uuid::new_v4();
        let create = CreateProject {
            name: "Website relaunch".to_string(),
            description: None,
            owner_id,
        };

        assert_eq!(create.name, "Website relaunch");
        assert_eq!(create.owner_id, owner_id);
    }
}
