use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Ids from `ids` that have no matching row
    async fn missing_ids(&self, ids: Vec<i64>) -> Result<Vec<i64>>;

    async fn create(&self, name: String, color: String) -> Result<Category>;

    async fn update(&self, id: i64, name: String, color: String) -> Result<Option<Category>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, color, created_at, updated_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, color, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by id: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn missing_ids(&self, ids: Vec<i64>) -> Result<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT requested.id
            FROM UNNEST($1::BIGINT[]) AS requested(id)
            LEFT JOIN categories c ON c.id = requested.id
            WHERE c.id IS NULL
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn create(&self, name: String, color: String) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, color)
            VALUES ($1, $2)
            RETURNING id, name, color, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update(&self, id: i64, name: String, color: String) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, color = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, color, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
