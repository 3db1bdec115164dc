use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::events::handlers;
use crate::features::events::services::EventService;

/// Create routes for the events feature
///
/// Listing, detail and calendar are public; who sees what is decided in the
/// service from the optional caller.
pub fn routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route(
            "/api/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/api/events/calendar/{year}/{month}",
            get(handlers::calendar_events),
        )
        .route(
            "/api/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route("/api/events/{id}/approve", post(handlers::approve_event))
        .route("/api/events/{id}/reject", post(handlers::reject_event))
        .route("/api/my-events", get(handlers::my_events))
        .with_state(service)
}
