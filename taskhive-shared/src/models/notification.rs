/// Persisted notification records
///
/// A notification row is the database-channel delivery record produced by the
/// dispatcher (see `crate::notify`). Actual delivery transport (email, push)
/// is out of scope; consumers read the `payload` JSON directly.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     payload JSONB NOT NULL DEFAULT '{}',
///     read_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Notification model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient user ID
    pub user_id: Uuid,

    /// Event payload (shape depends on the event type, see `crate::notify`)
    pub payload: JsonValue,

    /// When the recipient read the notification (None if unread)
    pub read_at: Option<DateTime<Utc>>,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates one notification row per recipient, in a single statement
    ///
    /// Returns the number of rows inserted. An empty recipient list is a
    /// no-op.
    pub async fn create_for_recipients(
        pool: &PgPool,
        recipients: &[Uuid],
        payload: &JsonValue,
    ) -> Result<u64, sqlx::Error> {
        if recipients.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, payload)
            SELECT recipient, $2::jsonb
            FROM UNNEST($1::uuid[]) AS t(recipient)
            "#,
        )
        .bind(recipients)
        .bind(payload)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Lists a user's notifications, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, payload, read_at, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Counts a user's unread notifications
    pub async fn count_unread(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
