/// Task authorization policy
///
/// The decision logic determining, per operation and per caller, whether
/// an action is permitted and which records are visible.
///
/// Every decision here is made against the record as freshly loaded from
/// the database, never against identifiers supplied in the request body.
/// A caller cannot widen its access by asserting a stale or forged
/// assignee or role in the payload; handlers fetch the task first and
/// pass the stored row in.
///
/// The rules, per operation:
///
/// | Operation            | Allowed callers        |
/// |----------------------|------------------------|
/// | Create task          | ADMIN only             |
/// | List tasks           | any (role-scoped)      |
/// | Update status only   | assignee or ADMIN      |
/// | Full update          | ADMIN only             |
/// | Delete task          | ADMIN only             |
/// | Create/list comments | any authenticated user |
///
/// The status-only and full update paths are deliberately separate
/// operations: their caller sets differ, and merging them would either
/// widen the full update to assignees or narrow status changes to admins.

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::{task::Task, user::Role};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not in the allowed set
    #[error("Access forbidden")]
    RoleNotAllowed,

    /// Caller is neither the task's assignee nor an admin
    #[error("Not authorized to update this task")]
    NotAssignee,
}

/// Which tasks a caller may see when listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Admins see every task
    All,

    /// Regular users see only tasks assigned to them
    AssignedTo(Uuid),
}

/// Checks that the caller's role is in the allowed set
///
/// # Errors
///
/// Returns `AuthzError::RoleNotAllowed` otherwise.
pub fn require_role(auth: &AuthContext, allowed: &[Role]) -> Result<(), AuthzError> {
    if !allowed.contains(&auth.role) {
        return Err(AuthzError::RoleNotAllowed);
    }

    Ok(())
}

/// Admin-only gate for create, full update, and delete
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    require_role(auth, &[Role::Admin])
}

/// Assignee-or-admin gate for the status-only update
///
/// `task` must be the row just fetched from the database; the current
/// `assignee_id` is the one that counts, not whatever the caller claims.
///
/// # Errors
///
/// Returns `AuthzError::NotAssignee` when the caller is neither the
/// assignee nor an admin.
pub fn require_status_update(auth: &AuthContext, task: &Task) -> Result<(), AuthzError> {
    if auth.role == Role::Admin || task.assignee_id == auth.user_id {
        return Ok(());
    }

    Err(AuthzError::NotAssignee)
}

/// Resolves the listing scope for a caller
///
/// Role-scoping happens before any status filter is applied.
pub fn visible_scope(auth: &AuthContext) -> TaskScope {
    match auth.role {
        Role::Admin => TaskScope::All,
        Role::User => TaskScope::AssignedTo(auth.user_id),
    }
}
