/// Notification events and the dispatcher that persists them
///
/// Resource services never write notification rows themselves. They describe
/// what happened as a [`NotificationEvent`] value and hand it to the
/// [`NotificationDispatcher`], which consumes events on a background tokio
/// task and persists one `notifications` row per recipient. This decouples
/// "what changed" from "how it's delivered": mutations return without
/// waiting on notification I/O, and ordering relative to the response is not
/// guaranteed (nor required).
///
/// Actual delivery transport is out of scope; the persisted row *is* the
/// delivery record.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::notify::{NotificationDispatcher, NotificationEvent};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # fn example(pool: PgPool) {
/// let dispatcher = NotificationDispatcher::spawn(pool);
///
/// dispatcher.dispatch(NotificationEvent::TaskAssigned {
///     task_id: Uuid::new_v4(),
///     task_title: "Ship the release".to_string(),
///     project_id: None,
///     assigned_by_name: "Jane".to_string(),
///     recipient: Uuid::new_v4(),
/// });
/// # }
/// ```

use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::comment::Comment;
use crate::models::notification::Notification;

/// A domain event that produces notifications
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// A comment was created in a project
    ///
    /// Recipients are the project's owner/co_owner/collaborator members,
    /// excluding the comment author (computed by the service).
    CommentCreated {
        comment: Comment,
        author_name: String,
        recipients: Vec<Uuid>,
    },

    /// A user was assigned to a task
    TaskAssigned {
        task_id: Uuid,
        task_title: String,
        project_id: Option<Uuid>,
        assigned_by_name: String,
        recipient: Uuid,
    },
}

impl NotificationEvent {
    /// The recipients this event fans out to
    pub fn recipients(&self) -> Vec<Uuid> {
        match self {
            NotificationEvent::CommentCreated { recipients, .. } => recipients.clone(),
            NotificationEvent::TaskAssigned { recipient, .. } => vec![*recipient],
        }
    }

    /// The JSON payload stored on each notification row
    pub fn payload(&self) -> JsonValue {
        match self {
            NotificationEvent::CommentCreated {
                comment,
                author_name,
                ..
            } => json!({
                "type": "new_comment",
                "comment_id": comment.id,
                "project_id": comment.project_id,
                "task_id": comment.task_id,
                "content": comment.content,
                "user_name": author_name,
            }),
            NotificationEvent::TaskAssigned {
                task_id,
                task_title,
                project_id,
                assigned_by_name,
                ..
            } => json!({
                "type": "task_assigned",
                "task_id": task_id,
                "task_title": task_title,
                "assigned_by": assigned_by_name,
                "project_id": project_id,
            }),
        }
    }
}

/// Persists an event as notification rows, one per recipient
///
/// Returns the number of rows written.
pub async fn deliver(pool: &PgPool, event: &NotificationEvent) -> Result<u64, sqlx::Error> {
    let recipients = event.recipients();
    let payload = event.payload();

    Notification::create_for_recipients(pool, &recipients, &payload).await
}

/// Handle for emitting notification events
///
/// Cheap to clone; all clones feed the same background drain task. The task
/// exits when every handle has been dropped.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl NotificationDispatcher {
    /// Spawns the drain task and returns a dispatch handle
    pub fn spawn(pool: PgPool) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<NotificationEvent>();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = deliver(&pool, &event).await {
                    // Notifications are fire-and-forget: log and move on
                    tracing::error!(error = %e, "Failed to persist notification");
                }
            }
            tracing::debug!("Notification dispatcher channel closed, stopping");
        });

        Self { tx }
    }

    /// Emits an event without waiting for it to be persisted
    pub fn dispatch(&self, event: NotificationEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Notification dispatcher is not running; event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_comment() -> Comment {
        Comment {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            task_id: Some(Uuid::new_v4()),
            user_id: Uuid::new_v4(),
            content: "Looks good to me".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_comment_payload_shape() {
        let comment = sample_comment();
        let event = NotificationEvent::CommentCreated {
            comment: comment.clone(),
            author_name: "Jane".to_string(),
            recipients: vec![Uuid::new_v4(), Uuid::new_v4()],
        };

        let payload = event.payload();
        assert_eq!(payload["type"], "new_comment");
        assert_eq!(payload["comment_id"], json!(comment.id));
        assert_eq!(payload["project_id"], json!(comment.project_id));
        assert_eq!(payload["content"], "Looks good to me");
        assert_eq!(payload["user_name"], "Jane");

        assert_eq!(event.recipients().len(), 2);
    }

    #[test]
    fn test_task_assigned_payload_shape() {
        let recipient = Uuid::new_v4();
        let event = NotificationEvent::TaskAssigned {
            task_id: Uuid::new_v4(),
            task_title: "Ship the release".to_string(),
            project_id: None,
            assigned_by_name: "Jane".to_string(),
            recipient,
        };

        let payload = event.payload();
        assert_eq!(payload["type"], "task_assigned");
        assert_eq!(payload["task_title"], "Ship the release");
        assert_eq!(payload["assigned_by"], "Jane");
        assert!(payload["project_id"].is_null());

        assert_eq!(event.recipients(), vec![recipient]);
    }
}
