use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Reads are public; writes go through the `RequireAdmin` guard.
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::features::categories::repositories::MockCategoryRepository;
    use crate::shared::test_helpers::{admin_user, organizer_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::json;

    fn music() -> Category {
        Category {
            id: 1,
            name: "Music".to_string(),
            color: "#8B5CF6".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn router(repo: MockCategoryRepository) -> Router {
        routes(Arc::new(CategoryService::new(Arc::new(repo))))
    }

    #[tokio::test]
    async fn test_list_categories_is_public() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list().returning(|| Ok(vec![music()]));

        let server = TestServer::new(router(repo)).unwrap();
        let response = server.get("/api/categories").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["color"], "#8B5CF6");
        assert_eq!(body["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_create_category_requires_authentication() {
        let server = TestServer::new(router(MockCategoryRepository::new())).unwrap();
        let response = server
            .post("/api/categories")
            .json(&json!({"name": "Film", "color": "#000000"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_category_forbidden_for_organizer() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().never();

        let app = with_user(router(repo), organizer_user(5));
        let server = TestServer::new(app).unwrap();
        let response = server
            .post("/api/categories")
            .json(&json!({"name": "Film", "color": "#000000"}))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_creates_category() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().returning(|name, color| {
            Ok(Category {
                id: 9,
                name,
                color,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

        let app = with_user(router(repo), admin_user(1));
        let server = TestServer::new(app).unwrap();
        let response = server
            .post("/api/categories")
            .json(&json!({"name": "Film", "color": "1f2937"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["color"], "#1f2937");
    }

    #[tokio::test]
    async fn test_invalid_color_returns_field_errors() {
        let app = with_user(router(MockCategoryRepository::new()), admin_user(1));
        let server = TestServer::new(app).unwrap();
        let response = server
            .post("/api/categories")
            .json(&json!({"name": "Film", "color": "blue"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["errors"][0].as_str().unwrap().starts_with("color:"));
    }
}
