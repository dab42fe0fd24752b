/// Request middleware
///
/// - `auth`: bearer-token authentication, resolving the current user

pub mod auth;
