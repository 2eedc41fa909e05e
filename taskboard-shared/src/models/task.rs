/// Task model and database operations
///
/// Tasks are the core entity of the system. Each task is delegated to one
/// assignee; authorization for mutating a task is decided against the
/// record as currently stored, which is why the update operations here
/// always work from a fresh `find_by_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'TODO',
///     due_date TIMESTAMPTZ,
///     assignee_id UUID NOT NULL REFERENCES users(id),
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskStatus};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, admin: Uuid, user: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(
///     &pool,
///     CreateTask {
///         title: "Ship the release".to_string(),
///         description: "Cut a tag and publish".to_string(),
///         assignee_id: user,
///         created_by: admin,
///         due_date: None,
///     },
/// )
/// .await?;
///
/// Task::update_status(&pool, task.id, TaskStatus::InProgress).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task progress states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Parses a status string from a query filter
    ///
    /// Returns `None` for anything outside the closed enum; callers must
    /// reject the request rather than silently ignore the filter.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TODO" => Some(TaskStatus::Todo),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "DONE" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Task model
///
/// Serialized in camelCase to match the JSON wire format.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Longer free-form description
    pub description: String,

    /// Current progress state
    pub status: TaskStatus,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,

    /// User this task is delegated to
    pub assignee_id: Uuid,

    /// Admin who created the task
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Short title
    pub title: String,

    /// Longer free-form description
    pub description: String,

    /// User the task is delegated to
    pub assignee_id: Uuid,

    /// Admin creating the task (taken from the caller identity, never the body)
    pub created_by: Uuid,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for the admin-only full update
///
/// All fields are optional; only present fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New progress state
    pub status: Option<TaskStatus>,

    /// New deadline
    pub due_date: Option<DateTime<Utc>>,

    /// New assignee
    pub assignee_id: Option<Uuid>,
}

impl Task {
    /// Creates a new task in TODO state
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, assignee_id, created_by, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, due_date, assignee_id,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.assignee_id)
        .bind(data.created_by)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    ///
    /// This is the re-fetch the authorization policy operates on.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, assignee_id,
                   created_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task, optionally filtered by status
    ///
    /// Admin-scope listing; the filter applies after role-scoping.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match status {
            Some(status) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, due_date, assignee_id,
                           created_by, created_at, updated_at
                    FROM tasks
                    WHERE status = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(status)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, due_date, assignee_id,
                           created_by, created_at, updated_at
                    FROM tasks
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Lists tasks assigned to one user, optionally filtered by status
    pub async fn list_by_assignee(
        pool: &PgPool,
        assignee_id: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match status {
            Some(status) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, due_date, assignee_id,
                           created_by, created_at, updated_at
                    FROM tasks
                    WHERE assignee_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(assignee_id)
                .bind(status)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, due_date, assignee_id,
                           created_by, created_at, updated_at
                    FROM tasks
                    WHERE assignee_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(assignee_id)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Updates only the status of a task
    ///
    /// Returns the updated task, or `None` if the task no longer exists.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, due_date, assignee_id,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies the admin-only full update
    ///
    /// Only present fields are written; `updated_at` is always bumped.
    /// Returns `None` if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the update statement from the fields that are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, due_date, \
             assignee_id, created_by, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Comments on the task are removed by CASCADE. Returns true if a task
    /// was deleted, false if none existed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "TODO");
        assert_eq!(TaskStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(TaskStatus::Done.as_str(), "DONE");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TaskStatus::parse("TODO"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::parse("IN_PROGRESS"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("DONE"), Some(TaskStatus::Done));

        // Unrecognized values must fail the request, not pass through
        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::parse("IN PROGRESS"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn test_status_parse_matches_serde() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            let wire = serde_json::to_string(&status).unwrap();
            let parsed = TaskStatus::parse(wire.trim_matches('"'));
            assert_eq!(parsed, Some(status));
        }
    }

    #[test]
    fn test_update_task_default_writes_nothing() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.status.is_none());
        assert!(update.due_date.is_none());
        assert!(update.assignee_id.is_none());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            status: TaskStatus::Todo,
            due_date: None,
            assignee_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("assigneeId").is_some());
        assert!(json.get("createdBy").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("assignee_id").is_none());
    }
}
