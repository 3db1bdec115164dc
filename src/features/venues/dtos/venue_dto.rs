use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::venues::models::Venue;
use crate::shared::types::nullable;

/// Response DTO for venue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VenueResponseDto {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Venue> for VenueResponseDto {
    fn from(v: Venue) -> Self {
        Self {
            id: v.id,
            name: v.name,
            address: v.address,
            latitude: v.latitude,
            longitude: v.longitude,
            capacity: v.capacity,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVenueDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
}

/// Partial update. `capacity: null` clears the stored capacity.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVenueDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<Option<i32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateVenueDto {
        CreateVenueDto {
            name: "Riverside Hall".to_string(),
            address: "1 River Rd".to_string(),
            latitude: 40.71,
            longitude: -74.0,
            capacity: Some(500),
        }
    }

    #[test]
    fn test_create_venue_valid() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn test_create_venue_rejects_out_of_range_coordinates() {
        let mut dto = create_dto();
        dto.latitude = 91.0;
        dto.longitude = -181.0;
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("latitude"));
        assert!(errors.field_errors().contains_key("longitude"));
    }

    #[test]
    fn test_create_venue_rejects_zero_capacity() {
        let mut dto = create_dto();
        dto.capacity = Some(0);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_venue_capacity_null_clears() {
        let dto: UpdateVenueDto = serde_json::from_str(r#"{"capacity": null}"#).unwrap();
        assert_eq!(dto.capacity, Some(None));
        assert!(dto.validate().is_ok());
    }
}
