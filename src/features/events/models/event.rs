use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Event lifecycle status matching the `event_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Pending,
    Approved,
    Cancelled,
    Rejected,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "pending" => Ok(EventStatus::Pending),
            "approved" => Ok(EventStatus::Approved),
            "cancelled" => Ok(EventStatus::Cancelled),
            "rejected" => Ok(EventStatus::Rejected),
            other => Err(format!("Unknown event status '{}'", other)),
        }
    }
}

/// Database model for event
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub venue_id: i64,
    pub organizer_id: i64,
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

/// Event row joined with its venue and organizer
#[derive(Debug, Clone, FromRow)]
pub struct EventRecord {
    #[sqlx(flatten)]
    pub event: Event,
    pub venue_name: String,
    pub venue_address: String,
    pub venue_latitude: f64,
    pub venue_longitude: f64,
    pub venue_capacity: Option<i32>,
    pub organizer_name: String,
    pub organizer_email: String,
}

/// Category attached to an event
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EventCategory {
    pub event_id: i64,
    pub id: i64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrganizerSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// An event with its venue, organizer and categories loaded
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetail {
    pub event: Event,
    pub venue: VenueSummary,
    pub organizer: OrganizerSummary,
    pub categories: Vec<CategorySummary>,
}

impl EventDetail {
    /// Assemble from a joined row and the category rows for all loaded events
    pub fn from_record(record: EventRecord, categories: &[EventCategory]) -> Self {
        let event = record.event;
        let categories = categories
            .iter()
            .filter(|c| c.event_id == event.id)
            .map(|c| CategorySummary {
                id: c.id,
                name: c.name.clone(),
                color: c.color.clone(),
            })
            .collect();

        Self {
            venue: VenueSummary {
                id: event.venue_id,
                name: record.venue_name,
                address: record.venue_address,
                latitude: record.venue_latitude,
                longitude: record.venue_longitude,
                capacity: record.venue_capacity,
            },
            organizer: OrganizerSummary {
                id: event.organizer_id,
                name: record.organizer_name,
                email: record.organizer_email,
            },
            categories,
            event,
        }
    }
}

/// Validated values for a new event
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub venue_id: i64,
    pub organizer_id: i64,
    pub ticket_price: Option<Decimal>,
    pub is_free: bool,
    pub website: Option<String>,
    pub ticketing_link: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub category_ids: Vec<i64>,
}

/// Full set of mutable columns after merging an update onto the stored event
#[derive(Debug, Clone, PartialEq)]
pub struct EventChanges {
    pub name: String,
    pub description: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub venue_id: i64,
    pub ticket_price: Option<Decimal>,
    pub is_free: bool,
    pub website: Option<String>,
    pub ticketing_link: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    /// `None` leaves the category links untouched
    pub category_ids: Option<Vec<i64>>,
}

/// Status write issued by approve/reject
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: EventStatus,
    /// `None` keeps the stored notes
    pub admin_notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventSort {
    #[default]
    StartDateTime,
    Name,
    CreatedAt,
}

impl EventSort {
    /// Query-string spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSort::StartDateTime => "start_date_time",
            EventSort::Name => "name",
            EventSort::CreatedAt => "created_at",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            EventSort::StartDateTime => "e.start_date_time",
            EventSort::Name => "e.name",
            EventSort::CreatedAt => "e.created_at",
        }
    }
}

impl std::str::FromStr for EventSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_date_time" => Ok(EventSort::StartDateTime),
            "name" => Ok(EventSort::Name),
            "created_at" => Ok(EventSort::CreatedAt),
            other => Err(format!("Unknown sort field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction '{}'", other)),
        }
    }
}

/// Repository-level filter; every `None` means "no constraint"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category_ids: Vec<i64>,
    pub venue_id: Option<i64>,
    pub organizer_id: Option<i64>,
    /// Calendar day (UTC) of the start time
    pub date: Option<NaiveDate>,
    pub is_free: Option<bool>,
    pub status: Option<EventStatus>,
    pub starts_from: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
    pub sort: EventSort,
    pub direction: SortDirection,
}
