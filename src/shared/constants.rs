/// Default page size for event listings
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Calendar view accepts years in this inclusive range
pub const CALENDAR_MIN_YEAR: i32 = 2020;
pub const CALENDAR_MAX_YEAR: i32 = 2030;

/// Message returned when a paid event is submitted without a price
pub const PAID_EVENT_PRICE_REQUIRED: &str = "Please specify a ticket price for paid events.";
