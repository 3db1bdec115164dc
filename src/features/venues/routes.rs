use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::venues::handlers;
use crate::features::venues::services::VenueService;

/// Create routes for the venues feature
pub fn routes(service: Arc<VenueService>) -> Router {
    Router::new()
        .route(
            "/api/venues",
            get(handlers::list_venues).post(handlers::create_venue),
        )
        .route(
            "/api/venues/{id}",
            get(handlers::get_venue)
                .put(handlers::update_venue)
                .delete(handlers::delete_venue),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::venues::models::Venue;
    use crate::features::venues::repositories::MockVenueRepository;
    use crate::shared::test_helpers::{admin_user, public_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::json;

    fn venue(id: i64) -> Venue {
        Venue {
            id,
            name: "Riverside Hall".to_string(),
            address: "1 River Rd".to_string(),
            latitude: 40.71,
            longitude: -74.0,
            capacity: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn router(repo: MockVenueRepository) -> Router {
        routes(Arc::new(VenueService::new(Arc::new(repo))))
    }

    #[tokio::test]
    async fn test_get_venue_is_public() {
        let mut repo = MockVenueRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(venue(id))));

        let server = TestServer::new(router(repo)).unwrap();
        let response = server.get("/api/venues/4").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["id"], 4);
        assert_eq!(body["data"]["capacity"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_get_unknown_venue_is_not_found() {
        let mut repo = MockVenueRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let server = TestServer::new(router(repo)).unwrap();
        server
            .get("/api/venues/404")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_venue_forbidden_for_public_user() {
        let mut repo = MockVenueRepository::new();
        repo.expect_delete().never();

        let server = TestServer::new(with_user(router(repo), public_user(2))).unwrap();
        server
            .delete("/api/venues/1")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_create_venue_validates_coordinates() {
        let mut repo = MockVenueRepository::new();
        repo.expect_create().never();

        let server = TestServer::new(with_user(router(repo), admin_user(1))).unwrap();
        let response = server
            .post("/api/venues")
            .json(&json!({
                "name": "Nowhere",
                "address": "Off the map",
                "latitude": 120.0,
                "longitude": 10.0
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["errors"][0],
            "latitude: Latitude must be between -90 and 90"
        );
    }
}
