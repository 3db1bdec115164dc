use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::repositories::CategoryRepository;
use crate::shared::validation::{normalize_color, required_text};

/// Service for category operations
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repository.list().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<CategoryResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let name = required_text("name", &dto.name, NAME_REQUIRED)?;
        let category = self
            .repository
            .create(name, normalize_color(&dto.color))
            .await?;

        tracing::info!(category_id = category.id, "Category created");
        Ok(category.into())
    }

    pub async fn update(&self, id: i64, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let name = match dto.name {
            Some(name) => required_text("name", &name, NAME_REQUIRED)?,
            None => current.name,
        };
        let color = dto
            .color
            .map(|c| normalize_color(&c))
            .unwrap_or(current.color);

        self.repository
            .update(id, name, color)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }
}

const NAME_REQUIRED: &str = "The name field is required.";

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::features::categories::repositories::MockCategoryRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn category(id: i64, name: &str, color: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: color.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_color() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create()
            .with(eq("Music".to_string()), eq("#8B5CF6".to_string()))
            .times(1)
            .returning(|name, color| Ok(category(1, &name, &color)));

        let service = CategoryService::new(Arc::new(repo));
        let created = service
            .create(CreateCategoryDto {
                name: "Music".to_string(),
                color: "8B5CF6".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.color, "#8B5CF6");
    }

    #[tokio::test]
    async fn test_update_keeps_existing_color_when_omitted() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(category(id, "Sports", "#10B981"))));
        repo.expect_update()
            .with(eq(2), eq("Outdoor".to_string()), eq("#10B981".to_string()))
            .returning(|id, name, color| Ok(Some(category(id, &name, &color))));

        let service = CategoryService::new(Arc::new(repo));
        let updated = service
            .update(
                2,
                UpdateCategoryDto {
                    name: Some("Outdoor".to_string()),
                    color: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Outdoor");
        assert_eq!(updated.color, "#10B981");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_write() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(category(id, "Sports", "#10B981"))));
        repo.expect_create().never();
        repo.expect_update().never();

        let service = CategoryService::new(Arc::new(repo));
        let err = service
            .create(CreateCategoryDto {
                name: "   ".to_string(),
                color: "#10B981".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));

        let err = service
            .update(
                2,
                UpdateCategoryDto {
                    name: Some("  ".to_string()),
                    color: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_get_missing_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = CategoryService::new(Arc::new(repo));
        assert!(matches!(
            service.get(99).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let service = CategoryService::new(Arc::new(repo));
        assert!(matches!(
            service.delete(99).await,
            Err(AppError::NotFound(_))
        ));
    }
}
