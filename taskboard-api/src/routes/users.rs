/// Identity echo endpoints
///
/// # Endpoints
///
/// - `GET /api/users/profile` - Echo of the resolved caller identity
/// - `GET /api/users/admin` - Role-gated echo (ADMIN only)

use crate::error::{ApiError, ApiResult};
use axum::{Extension, Json};
use serde::Serialize;
use taskboard_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::user::Role,
};

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Greeting
    pub message: String,

    /// Identity resolved by the access guard
    pub user: AuthContext,
}

/// Admin-area response
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    /// Greeting
    pub message: String,
}

/// Returns the caller identity as resolved by the access guard
pub async fn profile(Extension(auth): Extension<AuthContext>) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(ProfileResponse {
        message: "Welcome to your profile!".to_string(),
        user: auth,
    }))
}

/// Admin-only echo
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
pub async fn admin_area(Extension(auth): Extension<AuthContext>) -> ApiResult<Json<AdminResponse>> {
    require_role(&auth, &[Role::Admin]).map_err(ApiError::from)?;

    Ok(Json(AdminResponse {
        message: "Welcome, Admin!".to_string(),
    }))
}
