/// Task and comment endpoints
///
/// Every handler runs behind the access guard, so an `AuthContext` is
/// always present. Authorization is decided per operation against the
/// task as currently stored: mutating handlers re-fetch the task before
/// any policy check, and never trust identifiers in the request body.
///
/// # Endpoints
///
/// - `POST   /api/tasks` - Create task (ADMIN)
/// - `GET    /api/tasks?status=S` - List tasks (role-scoped)
/// - `PUT    /api/tasks/:id/status` - Update status (assignee or ADMIN)
/// - `PUT    /api/tasks/:id` - Full update (ADMIN)
/// - `DELETE /api/tasks/:id` - Delete task (ADMIN)
/// - `POST   /api/tasks/comments` - Comment on a task
/// - `GET    /api/tasks/:id/comments` - List a task's comments

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        authorization::{require_admin, require_status_update, visible_scope, TaskScope},
        middleware::AuthContext,
    },
    models::{
        comment::{Comment, CreateComment},
        task::{CreateTask, Task, TaskStatus, UpdateTask},
    },
};
use uuid::Uuid;

/// Create task request
///
/// Fields are optional at the serde level so that missing fields produce
/// a 400 with per-field details instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    pub title: Option<String>,

    /// Task description
    pub description: Option<String>,

    /// User the task is delegated to
    pub assignee_id: Option<Uuid>,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,
}

/// List tasks query parameters
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Optional status filter, applied after role-scoping
    pub status: Option<String>,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New progress state
    pub status: TaskStatus,
}

/// Full update request (ADMIN only); absent fields are left unchanged
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
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

/// Delete task response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Confirmation message
    pub message: String,
}

/// Create comment request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    /// Task the comment is attached to
    pub task_id: Option<Uuid>,

    /// Comment text
    pub content: Option<String>,
}

/// Create a new task (ADMIN only)
///
/// The creator recorded on the task is the authenticated caller, not
/// anything from the body.
///
/// # Errors
///
/// - `400 Bad Request`: Missing title, description, or assignee
/// - `401 Unauthorized`: No valid token
/// - `403 Forbidden`: Caller is not an admin
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    require_admin(&auth)?;

    let mut errors = Vec::new();
    if req.title.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationErrorDetail {
            field: "title".to_string(),
            message: "title is required".to_string(),
        });
    }
    if req.description.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationErrorDetail {
            field: "description".to_string(),
            message: "description is required".to_string(),
        });
    }
    if req.assignee_id.is_none() {
        errors.push(ValidationErrorDetail {
            field: "assigneeId".to_string(),
            message: "assigneeId is required".to_string(),
        });
    }
    if !errors.is_empty() {
        return Err(ApiError::ValidationError(errors));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            assignee_id: req.assignee_id.unwrap_or_default(),
            created_by: auth.user_id,
            due_date: req.due_date,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, assignee_id = %task.assignee_id, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks, role-scoped
///
/// Admins see every task; regular users only tasks assigned to them. The
/// optional status filter is validated against the closed enum and
/// applied after role-scoping.
///
/// # Errors
///
/// - `400 Bad Request`: Unrecognized status filter value
/// - `401 Unauthorized`: No valid token
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(TaskStatus::parse(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown status filter: {}", raw))
        })?),
        None => None,
    };

    let tasks = match visible_scope(&auth) {
        TaskScope::All => Task::list_all(&state.db, status).await?,
        TaskScope::AssignedTo(user_id) => {
            Task::list_by_assignee(&state.db, user_id, status).await?
        }
    };

    Ok(Json(tasks))
}

/// Update only the status of a task (assignee or ADMIN)
///
/// The task is re-fetched and the decision made against its stored
/// assignee; a reassigned task immediately stops accepting updates from
/// the previous assignee.
///
/// # Errors
///
/// - `401 Unauthorized`: No valid token
/// - `403 Forbidden`: Caller is neither the assignee nor an admin
/// - `404 Not Found`: Task does not exist
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_status_update(&auth, &task)?;

    let updated = Task::update_status(&state.db, id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Full update of a task (ADMIN only)
///
/// Distinct from the status-only update: the caller set differs, so the
/// two operations are kept separate.
///
/// # Errors
///
/// - `401 Unauthorized`: No valid token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Task does not exist
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    require_admin(&auth)?;

    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            due_date: req.due_date,
            assignee_id: req.assignee_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a task (ADMIN only)
///
/// # Errors
///
/// - `401 Unauthorized`: No valid token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Task does not exist
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    require_admin(&auth)?;

    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %id, "Deleted task");

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Comment on a task (any authenticated user)
///
/// The author recorded on the comment is the authenticated caller.
///
/// # Errors
///
/// - `400 Bad Request`: Missing taskId or content
/// - `401 Unauthorized`: No valid token
/// - `404 Not Found`: Task does not exist
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let mut errors = Vec::new();
    if req.task_id.is_none() {
        errors.push(ValidationErrorDetail {
            field: "taskId".to_string(),
            message: "taskId is required".to_string(),
        });
    }
    if req.content.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationErrorDetail {
            field: "content".to_string(),
            message: "content is required".to_string(),
        });
    }
    if !errors.is_empty() {
        return Err(ApiError::ValidationError(errors));
    }

    let task_id = req.task_id.unwrap_or_default();

    Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            task_id,
            user_id: auth.user_id,
            content: req.content.unwrap_or_default(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List the comments on one task (any authenticated user)
///
/// # Errors
///
/// - `401 Unauthorized`: No valid token
/// - `404 Not Found`: Task does not exist
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let comments = Comment::list_by_task(&state.db, task_id).await?;

    Ok(Json(comments))
}
