/// Request authentication middleware (the access guard)
///
/// Resolves the caller's identity from the `Authorization: Bearer <token>`
/// header before any handler runs. The token proves who the caller was
/// when it was issued; the guard then re-fetches the user record by id so
/// a deleted account cannot keep acting on a still-valid token, and so the
/// attached identity (id, email, role) reflects the database, not the
/// request.
///
/// On success an [`AuthContext`] is inserted into the request extensions
/// for handlers to extract with `Extension<AuthContext>`.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.email, auth.role.as_str())
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::user::{Role, User};

/// Identity resolved for the current request
///
/// Built from the user record as stored right now, not from the token
/// payload alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email address
    pub email: String,

    /// Account role
    pub role: Role,
}

impl AuthContext {
    /// Creates an auth context from a freshly fetched user record
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Error type for the authentication middleware
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Access denied. No token provided.")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token is valid but the referenced user no longer exists
    #[error("User no longer exists")]
    UserNotFound,

    /// Database error while resolving the user
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::DatabaseError(msg) => {
                tracing::error!("Auth middleware database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            // Every other failure is the caller's: unauthenticated
            other => (StatusCode::UNAUTHORIZED, other.to_string()).into_response(),
        }
    }
}

/// Authenticates a request and attaches the caller identity
///
/// Steps:
/// 1. Extract the bearer token from the Authorization header
/// 2. Validate signature, expiry, and issuer
/// 3. Re-fetch the user by id to confirm the account still exists
/// 4. Insert [`AuthContext`] into request extensions
///
/// # Errors
///
/// Returns 401 if the header is missing or malformed, the token is
/// invalid or expired, or the referenced user has been deleted; 500 if
/// the user lookup itself fails.
pub async fn authenticate(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    // The token alone is not trusted: the account must still exist, and
    // the attached role is whatever the database says now.
    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UserNotFound)?;

    req.extensions_mut().insert(AuthContext::from_user(&user));

    Ok(next.run(req).await)
}
