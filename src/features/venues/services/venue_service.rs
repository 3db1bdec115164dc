use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::venues::dtos::{CreateVenueDto, UpdateVenueDto, VenueResponseDto};
use crate::features::venues::models::VenueInput;
use crate::features::venues::repositories::VenueRepository;
use crate::shared::validation::required_text;

/// Service for venue operations
pub struct VenueService {
    repository: Arc<dyn VenueRepository>,
}

impl VenueService {
    pub fn new(repository: Arc<dyn VenueRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<VenueResponseDto>> {
        let venues = self.repository.list().await?;
        Ok(venues.into_iter().map(|v| v.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<VenueResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|v| v.into())
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, dto: CreateVenueDto) -> Result<VenueResponseDto> {
        let venue = self
            .repository
            .create(VenueInput {
                name: required_text("name", &dto.name, NAME_REQUIRED)?,
                address: required_text("address", &dto.address, ADDRESS_REQUIRED)?,
                latitude: dto.latitude,
                longitude: dto.longitude,
                capacity: dto.capacity,
            })
            .await?;

        tracing::info!(venue_id = venue.id, "Venue created");
        Ok(venue.into())
    }

    pub async fn update(&self, id: i64, dto: UpdateVenueDto) -> Result<VenueResponseDto> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let input = VenueInput {
            name: match dto.name {
                Some(name) => required_text("name", &name, NAME_REQUIRED)?,
                None => current.name,
            },
            address: match dto.address {
                Some(address) => required_text("address", &address, ADDRESS_REQUIRED)?,
                None => current.address,
            },
            latitude: dto.latitude.unwrap_or(current.latitude),
            longitude: dto.longitude.unwrap_or(current.longitude),
            capacity: dto.capacity.unwrap_or(current.capacity),
        };

        self.repository
            .update(id, input)
            .await?
            .map(|v| v.into())
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(venue_id = id, "Venue deleted");
        Ok(())
    }
}

const NAME_REQUIRED: &str = "The name field is required.";
const ADDRESS_REQUIRED: &str = "The address field is required.";

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Venue {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::venues::models::Venue;
    use crate::features::venues::repositories::MockVenueRepository;
    use chrono::Utc;
    use mockall::predicate::{always, eq};

    fn venue(id: i64) -> Venue {
        Venue {
            id,
            name: "Riverside Hall".to_string(),
            address: "1 River Rd".to_string(),
            latitude: 40.71,
            longitude: -74.0,
            capacity: Some(500),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_update_clears_capacity_on_null() {
        let mut repo = MockVenueRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(venue(id))));
        repo.expect_update()
            .with(eq(3), always())
            .returning(|id, input| {
                assert_eq!(input.capacity, None);
                assert_eq!(input.name, "Riverside Hall");
                let mut v = venue(id);
                v.capacity = input.capacity;
                Ok(Some(v))
            });

        let service = VenueService::new(Arc::new(repo));
        let updated = service
            .update(
                3,
                UpdateVenueDto {
                    capacity: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.capacity, None);
    }

    #[tokio::test]
    async fn test_update_missing_venue_is_not_found() {
        let mut repo = MockVenueRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let service = VenueService::new(Arc::new(repo));
        let err = service
            .update(3, UpdateVenueDto::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_trims_text_fields() {
        let mut repo = MockVenueRepository::new();
        repo.expect_create().returning(|input| {
            assert_eq!(input.name, "Riverside Hall");
            let mut v = venue(1);
            v.name = input.name;
            Ok(v)
        });

        let service = VenueService::new(Arc::new(repo));
        let created = service
            .create(CreateVenueDto {
                name: "  Riverside Hall ".to_string(),
                address: "1 River Rd".to_string(),
                latitude: 40.71,
                longitude: -74.0,
                capacity: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_blank_address_is_rejected_without_write() {
        let mut repo = MockVenueRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(venue(id))));
        repo.expect_create().never();
        repo.expect_update().never();

        let service = VenueService::new(Arc::new(repo));
        let err = service
            .create(CreateVenueDto {
                name: "Riverside Hall".to_string(),
                address: "     ".to_string(),
                latitude: 40.71,
                longitude: -74.0,
                capacity: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));

        let err = service
            .update(
                3,
                UpdateVenueDto {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));
    }
}
