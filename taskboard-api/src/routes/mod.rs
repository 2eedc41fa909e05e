/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Task and comment endpoints
/// - `users`: Identity echo endpoints

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
