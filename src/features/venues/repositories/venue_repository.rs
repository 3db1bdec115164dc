use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::venues::models::{Venue, VenueInput};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Venue>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Venue>>;

    async fn exists(&self, id: i64) -> Result<bool>;

    async fn create(&self, input: VenueInput) -> Result<Venue>;

    async fn update(&self, id: i64, input: VenueInput) -> Result<Option<Venue>>;

    /// Deleting a venue cascades to its events
    async fn delete(&self, id: i64) -> Result<bool>;
}

const VENUE_COLUMNS: &str =
    "id, name, address, latitude, longitude, capacity, created_at, updated_at";

pub struct PgVenueRepository {
    pool: PgPool,
}

impl PgVenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueRepository for PgVenueRepository {
    async fn list(&self) -> Result<Vec<Venue>> {
        let query = format!("SELECT {} FROM venues ORDER BY name", VENUE_COLUMNS);
        sqlx::query_as::<_, Venue>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list venues: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Venue>> {
        let query = format!("SELECT {} FROM venues WHERE id = $1", VENUE_COLUMNS);
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get venue by id: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM venues WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create(&self, input: VenueInput) -> Result<Venue> {
        let query = format!(
            r#"
            INSERT INTO venues (name, address, latitude, longitude, capacity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            VENUE_COLUMNS
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(input.name)
            .bind(input.address)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.capacity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create venue: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update(&self, id: i64, input: VenueInput) -> Result<Option<Venue>> {
        let query = format!(
            r#"
            UPDATE venues
            SET name = $2, address = $3, latitude = $4, longitude = $5,
                capacity = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VENUE_COLUMNS
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .bind(input.name)
            .bind(input.address)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.capacity)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update venue: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete venue: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
