//! Role-based authorization guards.
//!
//! These guards extract the authenticated user and verify the required role.
//!
//! Roles:
//! - admin: approves/rejects events, manages venues and categories, overrides ownership
//! - organizer: submits and manages their own events
//! - public: browses events
//!
//! Ownership checks (organizer edits their own event) live in the event
//! service since they need the stored record.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn current_user(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for admin-only endpoints.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

/// Guard for event submission.
///
/// Allows users with "organizer" or "admin" roles.
pub struct RequireOrganizer(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireOrganizer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.can_create_events() {
            return Err(AppError::Forbidden(
                "Organizer or admin access required".to_string(),
            ));
        }

        Ok(RequireOrganizer(user.clone()))
    }
}
