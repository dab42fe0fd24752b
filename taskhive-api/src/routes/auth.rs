/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Register a new account (public)
/// - `POST /login` - Exchange credentials for an access token (public)
/// - `POST /logout` - Revoke the presented token
/// - `GET /user` - Current authenticated user
///
/// Tokens are opaque bearer tokens; only their SHA-256 digest is stored, and
/// logout deletes the digest row, revoking the token immediately.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthSession,
    response::ApiResponse,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskhive_shared::{
    auth::{password, token},
    models::{
        access_token::AccessToken,
        user::{CreateUser, User, UserRole},
    },
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthData {
    /// The authenticated user (password hash never serialized)
    pub user: User,

    /// Plaintext access token; shown only here, store it client-side
    pub token: String,
}

/// Register a new user
///
/// The account role is always `user`; the role field is not accepted from
/// the client, preventing role injection.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed, or email already exists
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: UserRole::User,
        },
    )
    .await?;

    let (plaintext, digest) = token::generate_token();
    AccessToken::create(&state.db, user.id, &digest).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "Registration successful",
            AuthData {
                user,
                token: plaintext,
            },
        ),
    ))
}

/// Login with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthData>>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let (plaintext, digest) = token::generate_token();
    AccessToken::create(&state.db, user.id, &digest).await?;

    Ok(ApiResponse::ok(
        "Login successful",
        AuthData {
            user,
            token: plaintext,
        },
    ))
}

/// Revoke the token that authenticated this request
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    AccessToken::delete_by_hash(&state.db, &session.token_hash).await?;

    Ok(ApiResponse::ok(
        "Logged out successfully",
        serde_json::json!([]),
    ))
}

/// Return the current authenticated user
pub async fn current_user(
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<ApiResponse<User>>> {
    Ok(ApiResponse::ok("User retrieved", session.user))
}
