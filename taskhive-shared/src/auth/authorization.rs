/// Role-based authorization evaluator
///
/// This module is the single place where access decisions are made. It has
/// two layers:
///
/// 1. **Pure rules** — total functions over (actor, resource, resolved role)
///    that return `Ok(())` or a typed denial reason. They never touch the
///    database, which makes every rule unit-testable in isolation.
/// 2. **`require_*` wrappers** — thin async helpers that resolve the actor's
///    membership via [`Membership::role_of`] and delegate to the pure rule.
///
/// The actor is always passed explicitly; nothing here reads ambient state.
///
/// # Permission Model
///
/// - Personal tasks (no project) are visible and mutable only by their
///   creator.
/// - Project tasks inherit project membership: any role may view and modify
///   them, but creating tasks and assigning users requires
///   owner/co_owner/collaborator.
/// - Member management (add/remove) requires owner/co_owner, and the project
///   owner can never be removed.
/// - Deleting a project requires being the literal `owner_id` holder; the
///   `owner` pivot role alone is not consulted.
/// - Comments are open to any member; deleting someone else's comment
///   requires owner/co_owner.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::auth::authorization::require_task_access;
/// use taskhive_shared::models::task::Task;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, actor_id: Uuid, task: Task) -> Result<(), Box<dyn std::error::Error>> {
/// require_task_access(&pool, actor_id, &task).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::comment::Comment;
use crate::models::membership::{Membership, ProjectRole};
use crate::models::project::Project;
use crate::models::task::Task;

/// Typed denial reasons for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Actor has no membership row for the project
    #[error("Unauthorized project access")]
    NotProjectMember,

    /// Actor is a member but the role is too weak for the action
    #[error("Insufficient project permissions")]
    InsufficientRole,

    /// Personal task accessed by someone other than its creator
    #[error("Unauthorized personal task access")]
    NotTaskCreator,

    /// Project deletion attempted by someone other than the owner_id holder
    #[error("Only the project owner can delete this project")]
    NotProjectOwner,

    /// Member removal targeted the project owner
    #[error("Cannot remove the project owner")]
    CannotRemoveOwner,

    /// Creator self-removal from a personal task
    #[error("Cannot remove the creator from a personal task")]
    CannotUnassignCreator,

    /// Comment deletion by someone who is neither author nor owner/co-owner
    #[error("Not authorized to delete this comment")]
    CannotDeleteComment,

    /// Membership lookup failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Pure rules
// ---------------------------------------------------------------------------

/// View/modify/delete a task
///
/// Personal task: creator only. Project task: any membership role.
pub fn can_access_task(
    actor_id: Uuid,
    task: &Task,
    role: Option<ProjectRole>,
) -> Result<(), AuthzError> {
    if task.is_personal() {
        if task.created_by != actor_id {
            return Err(AuthzError::NotTaskCreator);
        }
        return Ok(());
    }

    if role.is_none() {
        return Err(AuthzError::NotProjectMember);
    }

    Ok(())
}

/// Create a task inside a project
///
/// Requires owner, co_owner, or collaborator.
pub fn can_create_project_task(role: Option<ProjectRole>) -> Result<(), AuthzError> {
    match role {
        None => Err(AuthzError::NotProjectMember),
        Some(r) if r.can_create_tasks() => Ok(()),
        Some(_) => Err(AuthzError::InsufficientRole),
    }
}

/// Delete a project
///
/// Only the literal `owner_id` holder may delete; the pivot role is not
/// consulted, so even a co-owner is refused.
pub fn can_delete_project(actor_id: Uuid, project: &Project) -> Result<(), AuthzError> {
    if project.owner_id != actor_id {
        return Err(AuthzError::NotProjectOwner);
    }

    Ok(())
}

/// Add or remove project members
///
/// Requires owner or co_owner.
pub fn can_manage_members(role: Option<ProjectRole>) -> Result<(), AuthzError> {
    match role {
        None => Err(AuthzError::NotProjectMember),
        Some(r) if r.can_manage_members() => Ok(()),
        Some(_) => Err(AuthzError::InsufficientRole),
    }
}

/// Remove a specific member
///
/// Management rights plus an unconditional guard: the owner_id holder can
/// never be removed, regardless of who asks.
pub fn can_remove_member(
    role: Option<ProjectRole>,
    project: &Project,
    target_user_id: Uuid,
) -> Result<(), AuthzError> {
    can_manage_members(role)?;

    if project.owner_id == target_user_id {
        return Err(AuthzError::CannotRemoveOwner);
    }

    Ok(())
}

/// Assign a user to a task
///
/// Personal task: only the creator assigns. Project task: owner, co_owner,
/// or collaborator.
pub fn can_assign_to_task(
    actor_id: Uuid,
    task: &Task,
    role: Option<ProjectRole>,
) -> Result<(), AuthzError> {
    if task.is_personal() {
        if task.created_by != actor_id {
            return Err(AuthzError::NotTaskCreator);
        }
        return Ok(());
    }

    match role {
        None => Err(AuthzError::NotProjectMember),
        Some(r) if r.can_assign_tasks() => Ok(()),
        Some(_) => Err(AuthzError::InsufficientRole),
    }
}

/// Remove a user from a task's assignee set
///
/// Self-removal is always allowed; removing someone else takes the same
/// rights as assigning. Either way, the creator of a personal task can never
/// be unassigned from it.
pub fn can_unassign_from_task(
    actor_id: Uuid,
    task: &Task,
    role: Option<ProjectRole>,
    target_user_id: Uuid,
) -> Result<(), AuthzError> {
    if actor_id != target_user_id {
        can_assign_to_task(actor_id, task, role)?;
    }

    if task.is_personal() && task.created_by == target_user_id {
        return Err(AuthzError::CannotUnassignCreator);
    }

    Ok(())
}

/// Create or view comments in a project
///
/// Any membership role suffices.
pub fn can_comment(role: Option<ProjectRole>) -> Result<(), AuthzError> {
    match role {
        None => Err(AuthzError::NotProjectMember),
        Some(_) => Ok(()),
    }
}

/// Delete a comment
///
/// The author may always delete their own comment; owners and co-owners may
/// delete anyone's. Non-members are rejected as non-members before the
/// author check.
pub fn can_delete_comment(
    actor_id: Uuid,
    comment: &Comment,
    role: Option<ProjectRole>,
) -> Result<(), AuthzError> {
    let role = role.ok_or(AuthzError::NotProjectMember)?;

    if comment.user_id == actor_id {
        return Ok(());
    }

    if role.can_moderate_comments() {
        return Ok(());
    }

    Err(AuthzError::CannotDeleteComment)
}

// ---------------------------------------------------------------------------
// Membership-resolving wrappers
// ---------------------------------------------------------------------------

/// Resolves the actor's role and requires any membership
///
/// Returns the role so callers can reuse it for follow-up decisions without
/// a second lookup.
pub async fn require_project_member(
    pool: &PgPool,
    project_id: Uuid,
    actor_id: Uuid,
) -> Result<ProjectRole, AuthzError> {
    Membership::role_of(pool, project_id, actor_id)
        .await?
        .ok_or(AuthzError::NotProjectMember)
}

/// View/modify/delete a task, resolving membership for project tasks
pub async fn require_task_access(
    pool: &PgPool,
    actor_id: Uuid,
    task: &Task,
) -> Result<(), AuthzError> {
    let role = resolve_task_role(pool, actor_id, task).await?;
    can_access_task(actor_id, task, role)
}

/// Create a task inside a project
pub async fn require_task_create(
    pool: &PgPool,
    project_id: Uuid,
    actor_id: Uuid,
) -> Result<(), AuthzError> {
    let role = Membership::role_of(pool, project_id, actor_id).await?;
    can_create_project_task(role)
}

/// Add or remove project members
pub async fn require_member_management(
    pool: &PgPool,
    project_id: Uuid,
    actor_id: Uuid,
) -> Result<(), AuthzError> {
    let role = Membership::role_of(pool, project_id, actor_id).await?;
    can_manage_members(role)
}

/// Assign a user to a task
pub async fn require_assignment_rights(
    pool: &PgPool,
    actor_id: Uuid,
    task: &Task,
) -> Result<(), AuthzError> {
    let role = resolve_task_role(pool, actor_id, task).await?;
    can_assign_to_task(actor_id, task, role)
}

/// Remove a user from a task's assignee set
pub async fn require_unassignment_rights(
    pool: &PgPool,
    actor_id: Uuid,
    task: &Task,
    target_user_id: Uuid,
) -> Result<(), AuthzError> {
    let role = resolve_task_role(pool, actor_id, task).await?;
    can_unassign_from_task(actor_id, task, role, target_user_id)
}

/// Membership lookup for a task's project; personal tasks have no role
async fn resolve_task_role(
    pool: &PgPool,
    actor_id: Uuid,
    task: &Task,
) -> Result<Option<ProjectRole>, AuthzError> {
    match task.project_id {
        Some(project_id) => Ok(Membership::role_of(pool, project_id, actor_id).await?),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};
    use chrono::Utc;

    fn user() -> Uuid {
        Uuid::new_v4()
    }

    fn project_owned_by(owner_id: Uuid) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Test project".to_string(),
            description: None,
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(project_id: Option<Uuid>, created_by: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id,
            created_by,
            title: "Test task".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn comment(project_id: Uuid, user_id: Uuid) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            project_id,
            task_id: None,
            user_id,
            content: "hello".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_personal_task_only_creator() {
        let creator = user();
        let stranger = user();
        let t = task(None, creator);

        assert!(can_access_task(creator, &t, None).is_ok());
        assert!(matches!(
            can_access_task(stranger, &t, None),
            Err(AuthzError::NotTaskCreator)
        ));
    }

    #[test]
    fn test_project_task_any_member() {
        let creator = user();
        let member = user();
        let outsider = user();
        let t = task(Some(Uuid::new_v4()), creator);

        // Any role, even plain member, may view and modify
        assert!(can_access_task(member, &t, Some(ProjectRole::Member)).is_ok());
        assert!(can_access_task(member, &t, Some(ProjectRole::Collaborator)).is_ok());

        assert!(matches!(
            can_access_task(outsider, &t, None),
            Err(AuthzError::NotProjectMember)
        ));
    }

    #[test]
    fn test_create_project_task_requires_collaborator_or_better() {
        assert!(can_create_project_task(Some(ProjectRole::Owner)).is_ok());
        assert!(can_create_project_task(Some(ProjectRole::CoOwner)).is_ok());
        assert!(can_create_project_task(Some(ProjectRole::Collaborator)).is_ok());

        assert!(matches!(
            can_create_project_task(Some(ProjectRole::Member)),
            Err(AuthzError::InsufficientRole)
        ));
        assert!(matches!(
            can_create_project_task(None),
            Err(AuthzError::NotProjectMember)
        ));
    }

    #[test]
    fn test_delete_project_pivot_role_is_insufficient() {
        let owner = user();
        let co_owner = user();
        let p = project_owned_by(owner);

        assert!(can_delete_project(owner, &p).is_ok());

        // Even a co_owner pivot role does not grant deletion
        assert!(matches!(
            can_delete_project(co_owner, &p),
            Err(AuthzError::NotProjectOwner)
        ));
    }

    #[test]
    fn test_manage_members_requires_owner_or_co_owner() {
        assert!(can_manage_members(Some(ProjectRole::Owner)).is_ok());
        assert!(can_manage_members(Some(ProjectRole::CoOwner)).is_ok());

        assert!(matches!(
            can_manage_members(Some(ProjectRole::Collaborator)),
            Err(AuthzError::InsufficientRole)
        ));
        assert!(matches!(
            can_manage_members(None),
            Err(AuthzError::NotProjectMember)
        ));
    }

    #[test]
    fn test_owner_can_never_be_removed() {
        let owner = user();
        let p = project_owned_by(owner);

        // Even the owner themselves, with full management rights
        assert!(matches!(
            can_remove_member(Some(ProjectRole::Owner), &p, owner),
            Err(AuthzError::CannotRemoveOwner)
        ));
        assert!(matches!(
            can_remove_member(Some(ProjectRole::CoOwner), &p, owner),
            Err(AuthzError::CannotRemoveOwner)
        ));

        // Removing anyone else works
        assert!(can_remove_member(Some(ProjectRole::Owner), &p, user()).is_ok());
    }

    #[test]
    fn test_assign_rules() {
        let creator = user();
        let other = user();

        // Personal task: only the creator
        let personal = task(None, creator);
        assert!(can_assign_to_task(creator, &personal, None).is_ok());
        assert!(matches!(
            can_assign_to_task(other, &personal, None),
            Err(AuthzError::NotTaskCreator)
        ));

        // Project task: collaborator or better
        let project_task = task(Some(Uuid::new_v4()), creator);
        assert!(can_assign_to_task(other, &project_task, Some(ProjectRole::Collaborator)).is_ok());
        assert!(matches!(
            can_assign_to_task(other, &project_task, Some(ProjectRole::Member)),
            Err(AuthzError::InsufficientRole)
        ));
    }

    #[test]
    fn test_self_unassign_ignores_role() {
        let creator = user();
        let member = user();
        let project_task = task(Some(Uuid::new_v4()), creator);

        // A plain member may remove themselves despite lacking assign rights
        assert!(
            can_unassign_from_task(member, &project_task, Some(ProjectRole::Member), member)
                .is_ok()
        );

        // But removing someone else still needs assign rights
        assert!(matches!(
            can_unassign_from_task(member, &project_task, Some(ProjectRole::Member), creator),
            Err(AuthzError::InsufficientRole)
        ));
    }

    #[test]
    fn test_personal_task_creator_cannot_self_unassign() {
        let creator = user();
        let personal = task(None, creator);

        assert!(matches!(
            can_unassign_from_task(creator, &personal, None, creator),
            Err(AuthzError::CannotUnassignCreator)
        ));
    }

    #[test]
    fn test_comment_rules() {
        let author = user();
        let moderator = user();
        let member = user();
        let outsider = user();
        let c = comment(Uuid::new_v4(), author);

        // Any member comments and views
        assert!(can_comment(Some(ProjectRole::Member)).is_ok());
        assert!(matches!(can_comment(None), Err(AuthzError::NotProjectMember)));

        // Author deletes own comment regardless of role
        assert!(can_delete_comment(author, &c, Some(ProjectRole::Member)).is_ok());

        // Owner/co-owner delete anyone's
        assert!(can_delete_comment(moderator, &c, Some(ProjectRole::Owner)).is_ok());
        assert!(can_delete_comment(moderator, &c, Some(ProjectRole::CoOwner)).is_ok());

        // Plain members cannot delete others' comments
        assert!(matches!(
            can_delete_comment(member, &c, Some(ProjectRole::Member)),
            Err(AuthzError::CannotDeleteComment)
        ));

        // Non-members bounce before the author check
        assert!(matches!(
            can_delete_comment(outsider, &c, None),
            Err(AuthzError::NotProjectMember)
        ));
    }

    /// User A creates project X; B joins as collaborator and creates task T;
    /// A removes B's membership; T survives but B loses access to it.
    #[test]
    fn test_membership_removal_revokes_task_access() {
        let a = user();
        let b = user();
        let x = project_owned_by(a);

        // B as collaborator may create tasks in X
        assert!(can_create_project_task(Some(ProjectRole::Collaborator)).is_ok());
        let t = task(Some(x.id), b);

        // While a member, B accesses T
        assert!(can_access_task(b, &t, Some(ProjectRole::Collaborator)).is_ok());

        // A (owner/co_owner) may remove B, who is not the owner
        assert!(can_remove_member(Some(ProjectRole::Owner), &x, b).is_ok());

        // After removal B's role resolves to None: access denied, task intact
        assert!(matches!(
            can_access_task(b, &t, None),
            Err(AuthzError::NotProjectMember)
        ));
        // A, still a member, keeps access to the orphaned creator's task
        assert!(can_access_task(a, &t, Some(ProjectRole::Owner)).is_ok());
    }
}
