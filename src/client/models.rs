//! Wire shapes as the API sends them and the canonical shapes the client
//! hands to callers.
//!
//! Wire types are deliberately loose: ids may be numbers or strings, prices
//! numbers or decimal strings, and the free flag a bool, `0`/`1` or `"0"`/`"1"`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::features::auth::model::UserRole;
use crate::features::events::dtos::PriceFilter;
use crate::features::events::models::{EventSort, EventStatus, SortDirection};
use crate::shared::types::Meta;

// =============================================================================
// WIRE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for WireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireId::Number(n) => write!(f, "{}", n),
            WireId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WirePrice {
    Number(f64),
    Text(String),
}

impl WirePrice {
    /// Numeric value; unparsable text counts as no price
    pub fn amount(&self) -> Option<f64> {
        match self {
            WirePrice::Number(n) => Some(*n),
            WirePrice::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl WireFlag {
    pub fn is_set(&self) -> bool {
        match self {
            WireFlag::Bool(b) => *b,
            WireFlag::Number(n) => *n == 1,
            WireFlag::Text(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireVenue {
    pub id: WireId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireOrganizer {
    pub id: WireId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCategory {
    pub id: WireId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEvent {
    pub id: WireId,
    pub name: String,
    pub description: String,
    #[serde(alias = "startDateTime")]
    pub start_date_time: DateTime<Utc>,
    #[serde(alias = "endDateTime")]
    pub end_date_time: DateTime<Utc>,
    pub venue: WireVenue,
    pub organizer: WireOrganizer,
    #[serde(default)]
    pub categories: Vec<WireCategory>,
    #[serde(default)]
    pub ticket_price: Option<WirePrice>,
    #[serde(default)]
    pub is_free: Option<WireFlag>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub ticketing_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: EventStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    pub id: WireId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAuth {
    pub user: WireUser,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// CANONICAL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub id: String,
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub venue: Venue,
    pub organizer: Organizer,
    pub categories: Vec<Category>,
    pub ticket_price: Option<f64>,
    pub is_free: bool,
    pub website: Option<String>,
    pub ticketing_link: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub admin_notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of events with the server's pagination meta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
}

/// An authenticated client session.
///
/// Returned by login/registration and passed explicitly to whoever needs
/// the caller's identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.user.role == role
    }

    pub fn can_perform_admin_actions(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    pub fn can_create_events(&self) -> bool {
        self.has_role(UserRole::Admin) || self.has_role(UserRole::Organizer)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Listing filters, serialized to the query string the API expects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilters {
    pub search: Option<String>,
    pub categories: Vec<i64>,
    pub date: Option<NaiveDate>,
    pub price_filter: Option<PriceFilter>,
    pub venue: Option<i64>,
    pub organizer: Option<i64>,
    pub status: Option<EventStatus>,
    pub sort_by: Option<EventSort>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl EventFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: String| query.push((key.to_string(), value));

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            push("search", search.to_string());
        }
        for id in &self.categories {
            push("categories[]", id.to_string());
        }
        if let Some(date) = self.date {
            push("date", date.format("%Y-%m-%d").to_string());
        }
        if let Some(price) = self.price_filter {
            let value = match price {
                PriceFilter::Free => "free",
                PriceFilter::Paid => "paid",
            };
            push("price_filter", value.to_string());
        }
        if let Some(venue) = self.venue {
            push("venue", venue.to_string());
        }
        if let Some(organizer) = self.organizer {
            push("organizer", organizer.to_string());
        }
        if let Some(status) = self.status {
            push("status", status.as_str().to_string());
        }
        if let Some(sort) = self.sort_by {
            push("sort_by", sort.as_str().to_string());
        }
        if let Some(direction) = self.sort_direction {
            push("sort_direction", direction.as_str().to_string());
        }
        if let Some(page) = self.page {
            push("page", page.to_string());
        }
        if let Some(per_page) = self.per_page {
            push("per_page", per_page.to_string());
        }

        query
    }
}

/// Event form data as submitted by an organizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub venue_id: Option<i64>,
    pub category_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticketing_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial event edit; only the set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueDraft {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
