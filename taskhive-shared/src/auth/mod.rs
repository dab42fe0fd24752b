/// Authentication and authorization utilities
///
/// This module provides the security primitives for Taskhive:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Opaque bearer token generation and hashing
/// - [`authorization`]: The role-based authorization evaluator
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id via the `argon2` crate
/// - **Access Tokens**: Secure random generation with SHA-256 digests stored
///   server-side, revocable on logout
/// - **Authorization**: Pure decision functions over (actor, resource, role),
///   with the membership lookup kept separate
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::auth::password::{hash_password, verify_password};
/// use taskhive_shared::auth::token::generate_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let (token, digest) = generate_token();
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod password;
pub mod token;
