//! # Taskhive Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the Taskhive API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pooling and migrations
//! - `notify`: Notification events and the dispatcher that persists them

pub mod auth;
pub mod db;
pub mod models;
pub mod notify;

/// Current version of the taskhive shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
