use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Account routes.
///
/// Login and register are open; the rest need a bearer token, which the
/// `AuthenticatedUser` extractor enforces.
pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/user", get(handlers::get_user))
        .route("/api/profile", put(handlers::update_profile))
        .route("/api/refresh", post(handlers::refresh_token))
        .with_state(service)
}
