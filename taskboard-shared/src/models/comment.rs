/// Comment model and database operations
///
/// Comments are append-only notes on a task. Any authenticated user may
/// comment on any existing task; comments are never edited or deleted in
/// this scope (they go away with the task via CASCADE).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Task the comment is attached to
    pub task_id: Uuid,

    /// Author (taken from the caller identity, never the body)
    pub user_id: Uuid,

    /// Comment text
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    /// Task the comment is attached to
    pub task_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Comment text
    pub content: String,
}

impl Comment {
    /// Creates a new comment
    ///
    /// Callers must verify the task exists first; the foreign key is the
    /// backstop, not the primary check.
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, content, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists all comments on one task, oldest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, user_id, content, created_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
