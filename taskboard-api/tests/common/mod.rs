/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - Test database setup (from `DATABASE_URL`) with migrations applied
/// - Seeded admin and regular users with known passwords
/// - Token generation
/// - Request/response helpers for driving the router directly

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::auth::password::hash_password;
use taskboard_shared::models::task::{CreateTask, Task};
use taskboard_shared::models::user::{CreateUser, Role, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Password every seeded admin gets
pub const ADMIN_PASSWORD: &str = "admin-password-123";

/// Password every seeded regular user gets
pub const USER_PASSWORD: &str = "user-password-123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
    pub admin_token: String,
    pub user: User,
    pub user_token: String,
    suffix: String,
}

impl TestContext {
    /// Creates a new test context with a seeded admin and regular user
    ///
    /// Each context uses a unique email suffix so tests can run
    /// concurrently against the same database.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to this crate's Cargo.toml)
        sqlx::migrate!("../migrations").run(&db).await?;

        let suffix = Uuid::new_v4().to_string();

        let admin = User::create(
            &db,
            CreateUser {
                email: format!("admin-{}@example.com", suffix),
                password_hash: hash_password(ADMIN_PASSWORD)?,
                role: Role::Admin,
            },
        )
        .await?;

        let user = User::create(
            &db,
            CreateUser {
                email: format!("user-{}@example.com", suffix),
                password_hash: hash_password(USER_PASSWORD)?,
                role: Role::User,
            },
        )
        .await?;

        let admin_token = create_token(&Claims::new(admin.id, admin.role), &config.jwt.secret)?;
        let user_token = create_token(&Claims::new(user.id, user.role), &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            admin,
            admin_token,
            user,
            user_token,
            suffix,
        })
    }

    /// Builds an email unique to this context, for registering extra users
    pub fn unique_email(&self, prefix: &str) -> String {
        format!("{}-{}@example.com", prefix, self.suffix)
    }

    /// Creates an extra user directly in the database and returns it with
    /// a valid token
    pub async fn create_extra_user(&self, prefix: &str, role: Role) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: self.unique_email(prefix),
                password_hash: hash_password(USER_PASSWORD)?,
                role,
            },
        )
        .await?;

        let token = create_token(&Claims::new(user.id, user.role), &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Cleans up every row this context created
    ///
    /// Tasks cascade their comments; users go last once nothing references
    /// them.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        let pattern = format!("%-{}@example.com", self.suffix);

        sqlx::query(
            "DELETE FROM tasks WHERE created_by IN (SELECT id FROM users WHERE email LIKE $1)",
        )
        .bind(&pattern)
        .execute(&self.db)
        .await?;

        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(&pattern)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Helper to create a task directly in the database
pub async fn create_test_task(
    ctx: &TestContext,
    title: &str,
    assignee_id: Uuid,
) -> anyhow::Result<Task> {
    let task = Task::create(
        &ctx.db,
        CreateTask {
            title: title.to_string(),
            description: "integration test task".to_string(),
            assignee_id,
            created_by: ctx.admin.id,
            due_date: None,
        },
    )
    .await?;

    Ok(task)
}

/// Builds a JSON request with an optional bearer token
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}
