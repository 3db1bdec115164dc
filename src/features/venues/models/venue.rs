use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for venue
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for insert and full-row update
#[derive(Debug, Clone, PartialEq)]
pub struct VenueInput {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i32>,
}
