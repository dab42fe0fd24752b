/// Opaque access token records
///
/// Bearer tokens are random strings handed out at register/login. Only the
/// SHA-256 digest is stored; authentication hashes the presented token and
/// looks the digest up here. Logout deletes the row, which revokes the token
/// immediately.
///
/// Token generation and hashing live in `crate::auth::token`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE access_tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Access token model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Unique token ID
    pub id: Uuid,

    /// User the token authenticates as
    pub user_id: Uuid,

    /// SHA-256 hex digest of the opaque token
    pub token_hash: String,

    /// When the token was issued
    pub created_at: DateTime<Utc>,

    /// When the token was last used to authenticate (None if never)
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Stores a new token digest for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
    ) -> Result<Self, sqlx::Error> {
        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (user_id, token_hash)
            VALUES ($1, $2)
            RETURNING id, user_id, token_hash, created_at, last_used_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_one(pool)
        .await?;

        Ok(token)
    }

    /// Looks up a token by its digest
    pub async fn find_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT id, user_id, token_hash, created_at, last_used_at
            FROM access_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(token)
    }

    /// Records that the token was just used
    pub async fn touch(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE access_tokens SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Revokes a token by its digest (logout)
    ///
    /// Returns true if a token row was deleted.
    pub async fn delete_by_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
