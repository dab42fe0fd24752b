/// Bearer-token authentication middleware
///
/// Validates opaque access tokens from the `Authorization: Bearer <token>`
/// header. The token is hashed and looked up in the `access_tokens` table;
/// on success the authenticated user is loaded and an [`AuthSession`] is
/// added to request extensions.
///
/// Handlers extract the session with Axum's `Extension` extractor and pass
/// `session.user` explicitly into every authorization and service call —
/// there is no ambient "current user".
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - The Authorization header is missing or not a Bearer token
/// - The token is malformed, unknown, or revoked
/// - The token's user no longer exists

use axum::{extract::Request, extract::State, http::header, middleware::Next, response::Response};

use crate::{app::AppState, error::ApiError};
use taskhive_shared::auth::token;
use taskhive_shared::models::access_token::AccessToken;
use taskhive_shared::models::user::User;

/// Authentication context added to request extensions
///
/// Carries the resolved user (the explicit actor for all downstream checks)
/// and the digest of the presented token, so logout can revoke exactly the
/// token that authenticated this request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated user
    pub user: User,

    /// SHA-256 digest of the presented token
    pub token_hash: String,
}

/// Token authentication middleware layer
pub async fn token_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    // Parse Bearer token
    let presented = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    // Cheap format check before touching the database
    if !token::validate_token_format(presented) {
        return Err(ApiError::Unauthorized("Invalid access token".to_string()));
    }

    let token_hash = token::hash_token(presented);

    let record = AccessToken::find_by_hash(&state.db, &token_hash)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or revoked access token".to_string()))?;

    let user = User::find_by_id(&state.db, record.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or revoked access token".to_string()))?;

    AccessToken::touch(&state.db, record.id).await?;

    req.extensions_mut().insert(AuthSession { user, token_hash });

    Ok(next.run(req).await)
}
