/// Database models for Taskboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: user accounts with role-based access
/// - `task`: tasks delegated to an assignee
/// - `comment`: comments attached to tasks

pub mod comment;
pub mod task;
pub mod user;
