/// Database models for Taskhive
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `access_token`: Opaque bearer tokens for API access
/// - `project`: Projects owned by a user, shared via memberships
/// - `membership`: User-project relationships with roles
/// - `task`: Personal and project tasks
/// - `assignment`: Task-user assignment pivot
/// - `comment`: Comments on projects and tasks
/// - `notification`: Persisted notification records
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::user::{User, CreateUser, UserRole};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod access_token;
pub mod assignment;
pub mod comment;
pub mod membership;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;
