use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::events::models::{
    CategorySummary, EventDetail, EventStatus, OrganizerSummary, VenueSummary,
};
use crate::shared::types::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventVenueDto {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i32>,
}

impl From<VenueSummary> for EventVenueDto {
    fn from(v: VenueSummary) -> Self {
        Self {
            id: v.id,
            name: v.name,
            address: v.address,
            latitude: v.latitude,
            longitude: v.longitude,
            capacity: v.capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventOrganizerDto {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<OrganizerSummary> for EventOrganizerDto {
    fn from(o: OrganizerSummary) -> Self {
        Self {
            id: o.id,
            name: o.name,
            email: o.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventCategoryDto {
    pub id: i64,
    pub name: String,
    pub color: String,
}

impl From<CategorySummary> for EventCategoryDto {
    fn from(c: CategorySummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            color: c.color,
        }
    }
}

/// Response DTO for event, with venue, organizer and categories embedded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponseDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub venue_id: i64,
    pub organizer_id: i64,
    pub venue: EventVenueDto,
    pub organizer: EventOrganizerDto,
    pub categories: Vec<EventCategoryDto>,
    /// Decimal string such as "25.00"; null for free events
    #[schema(value_type = Option<String>, example = "25.00")]
    pub ticket_price: Option<Decimal>,
    pub is_free: bool,
    pub website: Option<String>,
    pub ticketing_link: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub admin_notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventDetail> for EventResponseDto {
    fn from(detail: EventDetail) -> Self {
        let e = detail.event;
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            start_date_time: e.start_date_time,
            end_date_time: e.end_date_time,
            venue_id: e.venue_id,
            organizer_id: e.organizer_id,
            venue: detail.venue.into(),
            organizer: detail.organizer.into(),
            categories: detail.categories.into_iter().map(Into::into).collect(),
            ticket_price: e.ticket_price,
            is_free: e.is_free,
            website: e.website,
            ticketing_link: e.ticketing_link,
            image_url: e.image_url,
            status: e.status,
            admin_notes: e.admin_notes,
            approved_at: e.approved_at,
            rejected_at: e.rejected_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Request DTO for submitting an event
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 255, message = "The name field is required (max 255 characters)."))]
    pub name: String,

    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,

    pub start_date_time: DateTime<Utc>,

    pub end_date_time: DateTime<Utc>,

    pub venue_id: i64,

    #[validate(length(min = 1, message = "Select at least one category."))]
    pub category_ids: Vec<i64>,

    /// Accepts a number or a decimal string
    #[schema(value_type = Option<String>, example = "25.00")]
    pub ticket_price: Option<Decimal>,

    pub is_free: Option<bool>,

    #[validate(url(message = "The website must be a valid URL."))]
    pub website: Option<String>,

    #[validate(url(message = "The ticketing link must be a valid URL."))]
    pub ticketing_link: Option<String>,

    #[validate(url(message = "The image url must be a valid URL."))]
    pub image_url: Option<String>,

    /// Ignored: new events always start as pending
    pub status: Option<EventStatus>,
}

/// Request DTO for editing an event.
///
/// Omitted fields keep their stored value. The nullable fields
/// (`ticket_price`, `website`, `ticketing_link`, `image_url`) are cleared by an
/// explicit `null`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 255, message = "The name field is required (max 255 characters)."))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: Option<String>,

    pub start_date_time: Option<DateTime<Utc>>,

    pub end_date_time: Option<DateTime<Utc>>,

    pub venue_id: Option<i64>,

    #[validate(length(min = 1, message = "Select at least one category."))]
    pub category_ids: Option<Vec<i64>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, example = "25.00")]
    pub ticket_price: Option<Option<Decimal>>,

    pub is_free: Option<bool>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(url(message = "The website must be a valid URL."))]
    pub website: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(url(message = "The ticketing link must be a valid URL."))]
    pub ticketing_link: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(url(message = "The image url must be a valid URL."))]
    pub image_url: Option<Option<String>>,

    pub status: Option<EventStatus>,
}

/// Optional body for approving an event
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ApproveEventDto {
    pub admin_notes: Option<String>,
}

/// Body for rejecting an event
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RejectEventDto {
    /// Required; stored as the event's admin notes
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_body() -> serde_json::Value {
        json!({
            "name": "Jazz Night",
            "description": "An evening of live jazz by the river.",
            "start_date_time": "2030-06-01T19:00:00Z",
            "end_date_time": "2030-06-01T22:00:00Z",
            "venue_id": 1,
            "category_ids": [1, 4]
        })
    }

    #[test]
    fn test_create_event_accepts_numeric_or_string_price() {
        let mut body = create_body();
        body["ticket_price"] = json!(25.5);
        let dto: CreateEventDto = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(dto.ticket_price, Some("25.5".parse().unwrap()));

        body["ticket_price"] = json!("25.00");
        let dto: CreateEventDto = serde_json::from_value(body).unwrap();
        assert_eq!(dto.ticket_price, Some("25.00".parse().unwrap()));
    }

    #[test]
    fn test_create_event_requires_a_category() {
        let mut body = create_body();
        body["category_ids"] = json!([]);
        let dto: CreateEventDto = serde_json::from_value(body).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category_ids"));
    }

    #[test]
    fn test_create_event_rejects_bad_url() {
        let mut body = create_body();
        body["website"] = json!("not a url");
        let dto: CreateEventDto = serde_json::from_value(body).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("website"));
    }

    #[test]
    fn test_update_event_null_clears_website() {
        let dto: UpdateEventDto =
            serde_json::from_value(json!({"website": null, "name": "Renamed"})).unwrap();
        assert_eq!(dto.website, Some(None));
        assert_eq!(dto.ticketing_link, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_response_serializes_price_as_string() {
        use crate::features::events::models::{Event, EventDetail};

        let now = Utc::now();
        let detail = EventDetail {
            event: Event {
                id: 1,
                name: "Jazz Night".to_string(),
                description: "Live jazz".to_string(),
                start_date_time: now,
                end_date_time: now + chrono::Duration::hours(3),
                venue_id: 2,
                organizer_id: 3,
                ticket_price: Some("25.00".parse().unwrap()),
                is_free: false,
                website: None,
                ticketing_link: None,
                image_url: None,
                status: EventStatus::Approved,
                admin_notes: None,
                approved_at: Some(now),
                rejected_at: None,
                created_at: now,
                updated_at: now,
            },
            venue: VenueSummary {
                id: 2,
                name: "Riverside Hall".to_string(),
                address: "1 River Rd".to_string(),
                latitude: 40.7,
                longitude: -74.0,
                capacity: None,
            },
            organizer: OrganizerSummary {
                id: 3,
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
            },
            categories: vec![CategorySummary {
                id: 1,
                name: "Music".to_string(),
                color: "#8B5CF6".to_string(),
            }],
        };

        let value = serde_json::to_value(EventResponseDto::from(detail)).unwrap();
        assert_eq!(value["ticket_price"], "25.00");
        assert_eq!(value["status"], "approved");
        assert_eq!(value["categories"][0]["color"], "#8B5CF6");
        assert_eq!(value["venue"]["name"], "Riverside Hall");
    }
}
