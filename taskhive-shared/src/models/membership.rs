/// Membership model and database operations
///
/// This module provides the Membership model for user-project relationships
/// with role-based access control. It implements a many-to-many relationship
/// between users and projects carrying a role attribute.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_role AS ENUM ('owner', 'co_owner', 'collaborator', 'member');
///
/// CREATE TABLE memberships (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role project_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: The project creator. Exactly one per project, always the
///   user referenced by `projects.owner_id`, and never removable.
/// - **co_owner**: Can manage members and moderate comments like the owner,
///   but cannot delete the project.
/// - **collaborator**: Can create tasks and assign users.
/// - **member**: Can view the project, its tasks and comments, and comment.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::membership::{Membership, CreateMembership, ProjectRole};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project_id = Uuid::new_v4();
/// let user_id = Uuid::new_v4();
///
/// // Add a user to a project as a collaborator
/// let membership = Membership::create(&pool, CreateMembership {
///     project_id,
///     user_id,
///     role: ProjectRole::Collaborator,
/// }).await?;
///
/// // Resolve the user's role (None if not a member)
/// let role = Membership::role_of(&pool, project_id, user_id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Roles a user can hold within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// The project creator, mirrored from `projects.owner_id`
    Owner,

    /// Shares member management and comment moderation with the owner
    CoOwner,

    /// Can create tasks and assign users to them
    Collaborator,

    /// Read access plus commenting
    Member,
}

impl sqlx::postgres::PgHasArrayType for ProjectRole {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_project_role")
    }
}

impl ProjectRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::CoOwner => "co_owner",
            ProjectRole::Collaborator => "collaborator",
            ProjectRole::Member => "member",
        }
    }

    /// Can add and remove project members
    pub fn can_manage_members(&self) -> bool {
        matches!(self, ProjectRole::Owner | ProjectRole::CoOwner)
    }

    /// Can create tasks in the project
    pub fn can_create_tasks(&self) -> bool {
        matches!(
            self,
            ProjectRole::Owner | ProjectRole::CoOwner | ProjectRole::Collaborator
        )
    }

    /// Can assign users to project tasks
    pub fn can_assign_tasks(&self) -> bool {
        matches!(
            self,
            ProjectRole::Owner | ProjectRole::CoOwner | ProjectRole::Collaborator
        )
    }

    /// Can delete comments written by other members
    pub fn can_moderate_comments(&self) -> bool {
        matches!(self, ProjectRole::Owner | ProjectRole::CoOwner)
    }

    /// Receives a notification when a comment lands in the project
    pub fn notified_on_comments(&self) -> bool {
        matches!(
            self,
            ProjectRole::Owner | ProjectRole::CoOwner | ProjectRole::Collaborator
        )
    }
}

/// Membership model representing a user-project relationship with role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: ProjectRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign
    pub role: ProjectRole,
}

/// A project member joined with their user record, for project detail views
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberDetail {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Role within the project
    pub role: ProjectRole,
}

impl Membership {
    /// Creates a new membership (adds user to project)
    ///
    /// Accepts any executor so it can run inside the same transaction as the
    /// duplicate check or the project insert.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Membership already exists (primary key violation)
    /// - Project or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreateMembership,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING project_id, user_id, role, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    /// Resolves a user's role in a project
    ///
    /// This is the single lookup every authorization rule is built on.
    /// Returns None if the user has no membership row for the project.
    pub async fn role_of<'e>(
        executor: impl PgExecutor<'e>,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProjectRole>, sqlx::Error> {
        let role: Option<ProjectRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(role)
    }

    /// Checks if a user belongs to a project (any role)
    pub async fn exists<'e>(
        executor: impl PgExecutor<'e>,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Deletes a membership (removes user from project)
    ///
    /// The caller is responsible for refusing to remove the project owner;
    /// this method performs the raw delete only.
    ///
    /// Returns true if a membership row was deleted.
    pub async fn delete<'e>(
        executor: impl PgExecutor<'e>,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memberships WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of a project joined with their user records
    pub async fn members_of(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<MemberDetail>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberDetail>(
            r#"
            SELECT u.id, u.name, u.email, m.role
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Lists the user IDs of members holding any of the given roles
    ///
    /// Used to compute notification recipient sets.
    pub async fn member_ids_with_roles(
        pool: &PgPool,
        project_id: Uuid,
        roles: &[ProjectRole],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT user_id FROM memberships
            WHERE project_id = $1 AND role = ANY($2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .bind(roles)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_role_as_str() {
        assert_eq!(ProjectRole::Owner.as_str(), "owner");
        assert_eq!(ProjectRole::CoOwner.as_str(), "co_owner");
        assert_eq!(ProjectRole::Collaborator.as_str(), "collaborator");
        assert_eq!(ProjectRole::Member.as_str(), "member");
    }

    #[test]
    fn test_role_permissions() {
        // Owner and co-owner manage members and moderate comments
        assert!(ProjectRole::Owner.can_manage_members());
        assert!(ProjectRole::CoOwner.can_manage_members());
        assert!(!ProjectRole::Collaborator.can_manage_members());
        assert!(!ProjectRole::Member.can_manage_members());

        assert!(ProjectRole::Owner.can_moderate_comments());
        assert!(ProjectRole::CoOwner.can_moderate_comments());
        assert!(!ProjectRole::Collaborator.can_moderate_comments());
        assert!(!ProjectRole::Member.can_moderate_comments());

        // Collaborators additionally create and assign tasks
        assert!(ProjectRole::Owner.can_create_tasks());
        assert!(ProjectRole::CoOwner.can_create_tasks());
        assert!(ProjectRole::Collaborator.can_create_tasks());
        assert!(!ProjectRole::Member.can_create_tasks());

        assert!(ProjectRole::Collaborator.can_assign_tasks());
        assert!(!ProjectRole::Member.can_assign_tasks());
    }

    #[test]
    fn test_comment_notification_set_excludes_plain_members() {
        assert!(ProjectRole::Owner.notified_on_comments());
        assert!(ProjectRole::CoOwner.notified_on_comments());
        assert!(ProjectRole::Collaborator.notified_on_comments());
        assert!(!ProjectRole::Member.notified_on_comments());
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&ProjectRole::CoOwner).unwrap();
        assert_eq!(json, "\"co_owner\"");

        let role: ProjectRole = serde_json::from_str("\"collaborator\"").unwrap();
        assert_eq!(role, ProjectRole::Collaborator);
    }
}
