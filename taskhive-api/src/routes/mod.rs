/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, current user
/// - `projects`: Project CRUD
/// - `members`: Project membership management
/// - `tasks`: Task CRUD with pagination
/// - `assignments`: Task assignee management
/// - `comments`: Comment CRUD
/// - `dashboard`: Task statistics aggregate

pub mod assignments;
pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;
